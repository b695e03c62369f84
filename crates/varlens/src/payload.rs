//! Reader for the two files the in-target companion script is contracted to
//! produce: a base64 text file of raw element bytes and a JSON metadata file
//! naming their dtype and shape.

use std::path::Path;

use base64::Engine;

use crate::types::{LensError, LensResult, Tensor, TensorMeta};

/// Read and validate the companion script's output into a canonical tensor.
///
/// Any deviation — unreadable file, malformed metadata, undecodable or
/// wrong-length data — is fatal for the capture; there is no partial result.
pub fn read_payload(data_path: &Path, meta_path: &Path) -> LensResult<Tensor> {
    let encoded = read_text(data_path)?;
    let meta_text = read_text(meta_path)?;

    let meta: TensorMeta = serde_json::from_str(&meta_text)
        .map_err(|e| LensError::PayloadUnreadable(format!("bad metadata: {e}")))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| LensError::PayloadUnreadable(format!("bad base64 data: {e}")))?;

    tracing::debug!(
        dtype = %meta.dtype,
        shape = ?meta.shape,
        bytes = bytes.len(),
        "read companion payload"
    );

    Tensor::from_parts(bytes, meta.shape, meta.dtype)
        .map_err(|e| LensError::PayloadUnreadable(e.to_string()))
}

fn read_text(path: &Path) -> LensResult<String> {
    std::fs::read_to_string(path).map_err(|source| LensError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use std::fs;

    fn write_payload(dir: &tempfile::TempDir, data: &str, meta: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let data_path = dir.path().join("data.b64");
        let meta_path = dir.path().join("meta.json");
        fs::write(&data_path, data).unwrap();
        fs::write(&meta_path, meta).unwrap();
        (data_path, meta_path)
    }

    #[test]
    fn valid_payload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let raw = vec![7u8; 3 * 4 * 4]; // float32 [3, 4]
        let (data_path, meta_path) = write_payload(
            &dir,
            &STANDARD.encode(&raw),
            r#"{"dtype":"float32","shape":[3,4]}"#,
        );
        let t = read_payload(&data_path, &meta_path).unwrap();
        assert_eq!(t.dtype(), "float32");
        assert_eq!(t.shape(), &[3, 4]);
        assert_eq!(t.data(), raw.as_slice());
    }

    #[test]
    fn malformed_metadata_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let (data_path, meta_path) =
            write_payload(&dir, &STANDARD.encode([0u8; 4]), r#"{"dtype":"#);
        let err = read_payload(&data_path, &meta_path).unwrap_err();
        assert!(matches!(err, LensError::PayloadUnreadable(_)));
    }

    #[test]
    fn length_mismatch_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let (data_path, meta_path) = write_payload(
            &dir,
            &STANDARD.encode([0u8; 10]),
            r#"{"dtype":"float32","shape":[3,4]}"#,
        );
        let err = read_payload(&data_path, &meta_path).unwrap_err();
        assert!(matches!(err, LensError::PayloadUnreadable(_)));
    }

    #[test]
    fn unknown_dtype_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let (data_path, meta_path) = write_payload(
            &dir,
            &STANDARD.encode([0u8; 4]),
            r#"{"dtype":"object","shape":[4]}"#,
        );
        let err = read_payload(&data_path, &meta_path).unwrap_err();
        assert!(matches!(err, LensError::PayloadUnreadable(_)));
    }

    #[test]
    fn garbage_base64_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let (data_path, meta_path) =
            write_payload(&dir, "!!not base64!!", r#"{"dtype":"uint8","shape":[4]}"#);
        let err = read_payload(&data_path, &meta_path).unwrap_err();
        assert!(matches!(err, LensError::PayloadUnreadable(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_payload(&dir.path().join("absent.b64"), &dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, LensError::FileRead { .. }));
    }

    #[test]
    fn trailing_newline_in_data_file_is_tolerated() {
        // The companion writes the encoded string with open(..., "w"); some
        // editors and shells append a newline. Trim before decoding.
        let dir = tempfile::tempdir().unwrap();
        let mut data = STANDARD.encode([1u8, 2, 3, 4]);
        data.push('\n');
        let (data_path, meta_path) =
            write_payload(&dir, &data, r#"{"dtype":"uint8","shape":[4]}"#);
        let t = read_payload(&data_path, &meta_path).unwrap();
        assert_eq!(t.data(), &[1, 2, 3, 4]);
    }
}
