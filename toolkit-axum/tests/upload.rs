use axum::body::Body;
use axum::http::Request;
use toolkit_axum::upload::RANDOM_NAME_LEN;
use toolkit_axum::{upload_files, upload_one_file, ErrorKind, ToolsConfig, UploadOptions};

const PNG: &[u8] = include_bytes!("testdata/img.png");
const BOUNDARY: &str = "toolkit-test-boundary";

enum Part<'a> {
    File { field: &'a str, filename: &'a str, data: &'a [u8] },
    Text { field: &'a str, value: &'a str },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File { field, filename, data } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}").as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn png_part() -> Part<'static> {
    Part::File {
        field: "file",
        filename: "img.png",
        data: PNG,
    }
}

fn files_in(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn allowed_png_is_stored_under_a_random_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().with_allowed_file_types(["image/jpeg", "image/png"]);

    let files = upload_files(
        &config,
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(files.len(), 1);
    let file = &files[0];
    assert_eq!(file.original_file_name, "img.png");
    assert_eq!(file.new_file_name.len(), RANDOM_NAME_LEN + ".png".len());
    assert!(file.new_file_name.ends_with(".png"));
    assert_eq!(file.file_size, PNG.len() as u64);

    let stored = std::fs::read(dir.path().join(&file.new_file_name)).unwrap();
    assert_eq!(stored, PNG);
}

#[tokio::test]
async fn allowed_png_keeps_its_name_without_rename() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().with_allowed_file_types(["image/jpeg", "image/png"]);

    let files = upload_files(
        &config,
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::new().keep_original_name(),
    )
    .await
    .unwrap();

    assert_eq!(files[0].new_file_name, "img.png");
    assert!(dir.path().join("img.png").is_file());
}

#[tokio::test]
async fn png_outside_the_allow_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().with_allowed_file_types(["image/jpeg"]);

    let err = upload_files(
        &config,
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeNotAllowed);
    assert!(err.uploaded.is_empty());
    assert_eq!(files_in(dir.path()), 0);
}

#[tokio::test]
async fn allow_list_match_ignores_case() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().allow_file_type("IMAGE/PNG");

    let files = upload_files(
        &config,
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn missing_upload_directory_is_created() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("uploads").join("2024");

    let files = upload_files(
        &ToolsConfig::new(),
        multipart_request(&[png_part()]),
        &dir,
        UploadOptions::default(),
    )
    .await
    .unwrap();

    assert!(dir.join(&files[0].new_file_name).is_file());
}

#[tokio::test]
async fn every_file_part_is_stored_and_text_fields_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let parts = [
        Part::Text {
            field: "title",
            value: "holiday",
        },
        png_part(),
        Part::File {
            field: "notes",
            filename: "notes.txt",
            data: b"remember the sunscreen",
        },
    ];

    let files = upload_files(
        &ToolsConfig::new(),
        multipart_request(&parts),
        dir.path(),
        UploadOptions::new().keep_original_name(),
    )
    .await
    .unwrap();

    let names: Vec<_> = files.iter().map(|f| f.new_file_name.as_str()).collect();
    assert_eq!(names, ["img.png", "notes.txt"]);
    assert_eq!(files[1].file_size, 22);
    assert_eq!(files_in(dir.path()), 2);
}

#[tokio::test]
async fn first_failure_returns_files_already_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().allow_file_type("image/png");
    let parts = [
        png_part(),
        Part::File {
            field: "notes",
            filename: "notes.txt",
            data: b"plain text is not an image",
        },
        Part::File {
            field: "again",
            filename: "again.png",
            data: PNG,
        },
    ];

    let err = upload_files(
        &config,
        multipart_request(&parts),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeNotAllowed);
    assert_eq!(err.uploaded.len(), 1);
    assert_eq!(err.uploaded[0].original_file_name, "img.png");
    assert!(dir.path().join(&err.uploaded[0].new_file_name).is_file());
    assert_eq!(files_in(dir.path()), 1);
}

#[tokio::test]
async fn large_files_are_stored_completely() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = PNG.to_vec();
    data.extend(std::iter::repeat(0xAB).take(256 * 1024));

    let files = upload_files(
        &ToolsConfig::new().allow_file_type("image/png"),
        multipart_request(&[Part::File {
            field: "file",
            filename: "big.png",
            data: &data,
        }]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(files[0].file_size, data.len() as u64);
    let stored = std::fs::read(dir.path().join(&files[0].new_file_name)).unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn stream_over_the_cap_is_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().with_max_file_size(100);

    let err = upload_files(
        &config,
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TooLarge);
    assert!(err.to_string().contains("100 bytes"));
}

#[tokio::test]
async fn declared_length_over_the_cap_is_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig::new().with_max_file_size(100);
    let body = multipart_body(&[png_part()]);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    let err = upload_files(&config, request, dir.path(), UploadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TooLarge);
    assert_eq!(files_in(dir.path()), 0);
}

#[tokio::test]
async fn non_multipart_request_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let err = upload_files(
        &ToolsConfig::new(),
        request,
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Multipart);
}

#[tokio::test]
async fn upload_one_file_returns_the_single_file() {
    let dir = tempfile::tempdir().unwrap();

    let file = upload_one_file(
        &ToolsConfig::new(),
        multipart_request(&[png_part()]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap();

    assert!(dir.path().join(&file.new_file_name).is_file());
    assert_eq!(file.file_size, PNG.len() as u64);
}

#[tokio::test]
async fn upload_one_file_ignores_later_parts() {
    let dir = tempfile::tempdir().unwrap();
    let parts = [
        png_part(),
        Part::File {
            field: "second",
            filename: "second.png",
            data: PNG,
        },
    ];

    let file = upload_one_file(
        &ToolsConfig::new(),
        multipart_request(&parts),
        dir.path(),
        UploadOptions::new().keep_original_name(),
    )
    .await
    .unwrap();

    assert_eq!(file.new_file_name, "img.png");
    assert_eq!(files_in(dir.path()), 1);
}

#[tokio::test]
async fn upload_one_file_without_files_fails() {
    let dir = tempfile::tempdir().unwrap();

    let err = upload_one_file(
        &ToolsConfig::new(),
        multipart_request(&[Part::Text {
            field: "title",
            value: "no file here",
        }]),
        dir.path(),
        UploadOptions::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoFileProvided);
    assert!(err.uploaded.is_empty());
}
