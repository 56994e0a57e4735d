use crate::configuration::FileSettings;

/// Turns stored attachment locations into something a client can fetch.
pub trait FileStorage: Send + Sync {
    fn download_url(&self, path: &str) -> String;

    /// Display name: everything after the last `/` or `\`.
    fn file_name(&self, path: &str) -> String {
        path.rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(path)
            .to_string()
    }
}

/// Builds `<download_base_url>?path=<encoded path>` links; the files themselves
/// are served by the storage service.
pub struct LinkFileStorage {
    download_base_url: String,
}

impl LinkFileStorage {
    pub fn new(settings: &FileSettings) -> Self {
        Self {
            download_base_url: settings.download_base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FileStorage for LinkFileStorage {
    fn download_url(&self, path: &str) -> String {
        format!(
            "{}?path={}",
            self.download_base_url,
            urlencoding::encode(path)
        )
    }
}
