use std::path::Path;

use crate::error::{IntranetError, IntranetResult};

pub const ALLOWED_FILE_TYPES: [&str; 4] = ["application/pdf", "image/jpeg", "image/png", "image/jpg"];
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// A document held in memory, ready to be attached to a form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn from_path(path: &Path) -> IntranetResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "documento".to_string());
        let mime_type = mime_from_extension(&file_name).to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub fn mime_from_extension(file_name: &str) -> &'static str {
    match file_extension(Some(file_name)).as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Checks type and size of a document. The server validates everything else.
pub fn validate_file(mime_type: &str, size: u64) -> IntranetResult<()> {
    if !ALLOWED_FILE_TYPES.contains(&mime_type) {
        return Err(IntranetError::validation(
            "documento_licencia",
            "Formato no válido. Use PDF, JPG o PNG.",
        ));
    }
    if size > MAX_FILE_SIZE {
        return Err(IntranetError::validation(
            "documento_licencia",
            format!("Archivo muy pesado. Máximo {}.", format_file_size(MAX_FILE_SIZE)),
        ));
    }
    Ok(())
}

/// Lower-cased extension of a document URL or file name, `default` when none.
pub fn file_extension(url: Option<&str>) -> String {
    let url = match url {
        Some(u) if !u.is_empty() => u,
        _ => return "default".to_string(),
    };
    match url.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => "default".to_string(),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let k = 1024f64;
    let bytes = bytes as f64;
    let i = ((bytes.ln() / k.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes / k.powi(i as i32);
    // two decimals, trailing zeros dropped: 5.00 -> 5, 1.50 -> 1.5
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_pdf_passes() {
        assert!(validate_file("application/pdf", 1024).is_ok());
        assert!(validate_file("image/png", MAX_FILE_SIZE).is_ok());
    }

    #[test]
    fn plain_text_is_rejected() {
        let err = validate_file("text/plain", 10).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "documento_licencia: Formato no válido. Use PDF, JPG o PNG.");
    }

    #[test]
    fn six_megabytes_is_rejected_for_any_type() {
        let six_mb = 6 * 1024 * 1024;
        for mime in ALLOWED_FILE_TYPES {
            assert!(validate_file(mime, six_mb).is_err(), "{mime} should be too large");
        }
        assert!(validate_file("text/plain", six_mb).is_err());
    }

    #[test]
    fn size_limit_message() {
        let err = validate_file("application/pdf", MAX_FILE_SIZE + 1).unwrap_err();
        assert_eq!(err.banner(""), "Archivo muy pesado. Máximo 5 MB.");
    }

    #[test]
    fn extension_from_url() {
        assert_eq!(file_extension(Some("/media/licencias/2024/04/a.PDF")), "pdf");
        assert_eq!(file_extension(Some("sin_extension")), "default");
        assert_eq!(file_extension(None), "default");
        assert_eq!(mime_from_extension("foto.JPG"), "image/jpeg");
        assert_eq!(mime_from_extension("notas.txt"), "text/plain");
    }

    #[test]
    fn human_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(MAX_FILE_SIZE), "5 MB");
    }

    #[tokio::test]
    async fn reads_file_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licencia.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "licencia.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size(), 4);
    }
}
