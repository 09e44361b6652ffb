use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{FanwallError, FanwallResult};

/// How an image request is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// Cross-origin request; the response must opt in to sharing.
    Cors,
    /// Opaque request; the bytes are usable for drawing but the frame becomes tainted.
    NoCors,
}

/// Byte source for patches, logos and image themes.
pub trait ImageFetcher {
    /// Fetch the raw encoded bytes behind `src`.
    fn fetch(&self, src: &str, mode: FetchMode) -> FanwallResult<Vec<u8>>;
}

/// A decoded image plus its provenance.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Premultiplied pixels.
    pub image: PreparedImage,
    /// Whether the image was obtained without cross-origin approval.
    pub tainted: bool,
}

/// Loads images with a cross-origin attempt first and one opaque retry.
///
/// Successful loads are cached per source string, least recently used first out. The cache is
/// bounded by entry count (`FANWALL_IMAGE_CACHE_CAPACITY`, default 16) and by decoded bytes.
pub struct AssetLoader {
    fetcher: Box<dyn ImageFetcher>,
    cache: HashMap<String, LoadedImage>,
    lru: VecDeque<String>,
    capacity: usize,
    cached_bytes: usize,
}

/// Decoded bytes kept across passes before older images are dropped.
pub const IMAGE_CACHE_BYTES: usize = 128 << 20;

impl AssetLoader {
    /// Wrap a fetcher.
    pub fn new(fetcher: impl ImageFetcher + 'static) -> Self {
        let capacity = std::env::var("FANWALL_IMAGE_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(16);
        Self::with_capacity(fetcher, capacity)
    }

    /// Wrap a fetcher, keeping at most `capacity` decoded images.
    pub fn with_capacity(fetcher: impl ImageFetcher + 'static, capacity: usize) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
            cached_bytes: 0,
        }
    }

    /// Load and decode `src`, retrying once without cross-origin mode.
    #[tracing::instrument(skip(self))]
    pub fn load_image(&mut self, src: &str) -> FanwallResult<LoadedImage> {
        if let Some(hit) = self.cache.get(src).cloned() {
            self.touch(src);
            return Ok(hit);
        }

        let loaded = match self.fetch_decoded(src, FetchMode::Cors) {
            Ok(image) => LoadedImage {
                image,
                tainted: false,
            },
            Err(cors_err) => {
                tracing::debug!(error = %cors_err, "cors load failed, retrying without cors");
                match self.fetch_decoded(src, FetchMode::NoCors) {
                    Ok(image) => LoadedImage {
                        image,
                        tainted: true,
                    },
                    Err(err) => {
                        return Err(FanwallError::image_load(format!(
                            "'{src}': cors: {cors_err}; no-cors: {err}"
                        )));
                    }
                }
            }
        };

        self.insert(src, loaded.clone());
        Ok(loaded)
    }

    /// Number of cached images.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Decoded bytes currently held by the cache.
    pub fn cached_bytes(&self) -> usize {
        self.cached_bytes
    }

    fn insert(&mut self, src: &str, loaded: LoadedImage) {
        self.cached_bytes += loaded.image.rgba8_premul.len();
        if let Some(old) = self.cache.insert(src.to_string(), loaded) {
            self.cached_bytes -= old.image.rgba8_premul.len();
        }
        self.touch(src);
        while self.lru.len() > 1
            && (self.lru.len() > self.capacity || self.cached_bytes > IMAGE_CACHE_BYTES)
        {
            let Some(old) = self.lru.pop_front() else {
                break;
            };
            if let Some(evicted) = self.cache.remove(&old) {
                self.cached_bytes -= evicted.image.rgba8_premul.len();
                tracing::debug!(src = %old, "evicted cached image");
            }
        }
    }

    fn touch(&mut self, src: &str) {
        if let Some(pos) = self.lru.iter().position(|k| k == src) {
            self.lru.remove(pos);
        }
        self.lru.push_back(src.to_string());
    }

    fn fetch_decoded(&self, src: &str, mode: FetchMode) -> FanwallResult<PreparedImage> {
        let bytes = self.fetcher.fetch(src, mode)?;
        decode_image(&bytes)
    }
}

/// Reads asset-relative paths below a root directory. Local files are same-origin.
#[derive(Clone, Debug)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageFetcher for DirFetcher {
    fn fetch(&self, src: &str, _mode: FetchMode) -> FanwallResult<Vec<u8>> {
        let norm = normalize_rel_path(src)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(FanwallError::from)
    }
}

/// HTTP(S) fetcher that emulates browser cross-origin rules.
#[cfg(feature = "http")]
pub struct HttpFetcher {
    agent: ureq::Agent,
    origin: String,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Fetch on behalf of `origin` (sent as the `Origin` header in CORS mode).
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            origin: origin.into(),
        }
    }
}

#[cfg(feature = "http")]
impl ImageFetcher for HttpFetcher {
    fn fetch(&self, src: &str, mode: FetchMode) -> FanwallResult<Vec<u8>> {
        let request = self.agent.get(src);
        let mut resp = match mode {
            FetchMode::Cors => request.header("Origin", self.origin.as_str()).call(),
            FetchMode::NoCors => request.call(),
        }
        .map_err(|e| FanwallError::image_load(format!("GET {src}: {e}")))?;

        if mode == FetchMode::Cors {
            let allowed = resp
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "*" || v == self.origin);
            if !allowed {
                return Err(FanwallError::image_load(format!(
                    "GET {src}: response does not allow origin '{}'",
                    self.origin
                )));
            }
        }

        resp.body_mut()
            .read_to_vec()
            .map_err(|e| FanwallError::image_load(format!("GET {src}: read body: {e}")))
    }
}

/// Dispatches `http(s)://` sources to the network and everything else to a directory.
pub struct SourceFetcher {
    dir: DirFetcher,
    #[cfg(feature = "http")]
    http: HttpFetcher,
}

impl SourceFetcher {
    /// Local assets below `assets_root`; remote requests identify as `origin`.
    pub fn new(assets_root: impl Into<PathBuf>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        #[cfg(not(feature = "http"))]
        let _ = origin;
        Self {
            dir: DirFetcher::new(assets_root),
            #[cfg(feature = "http")]
            http: HttpFetcher::new(origin),
        }
    }
}

impl ImageFetcher for SourceFetcher {
    fn fetch(&self, src: &str, mode: FetchMode) -> FanwallResult<Vec<u8>> {
        if !is_remote(src) {
            return self.dir.fetch(src, mode);
        }
        #[cfg(feature = "http")]
        {
            self.http.fetch(src, mode)
        }
        #[cfg(not(feature = "http"))]
        {
            Err(FanwallError::image_load(format!(
                "'{src}': remote images require the `http` feature"
            )))
        }
    }
}

/// In-memory fetcher, useful for embedding bundled assets and for tests.
///
/// Entries registered as opaque refuse [`FetchMode::Cors`] requests, like a server that sends no
/// cross-origin headers.
#[derive(Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, (Vec<u8>, bool)>,
    log: Mutex<Vec<(String, FetchMode)>>,
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes that may be fetched in either mode.
    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(src.into(), (bytes, true));
    }

    /// Register bytes that are only served to [`FetchMode::NoCors`] requests.
    pub fn insert_opaque(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(src.into(), (bytes, false));
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<(String, FetchMode)> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, src: &str, mode: FetchMode) -> FanwallResult<Vec<u8>> {
        if let Ok(mut log) = self.log.lock() {
            log.push((src.to_string(), mode));
        }
        match self.entries.get(src) {
            Some((_, false)) if mode == FetchMode::Cors => Err(FanwallError::image_load(format!(
                "'{src}': blocked by cross-origin policy"
            ))),
            Some((bytes, _)) => Ok(bytes.clone()),
            None => Err(FanwallError::image_load(format!("'{src}': not found"))),
        }
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for std::sync::Arc<T> {
    fn fetch(&self, src: &str, mode: FetchMode) -> FanwallResult<Vec<u8>> {
        (**self).fetch(src, mode)
    }
}

fn is_remote(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Normalize and validate asset-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> FanwallResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FanwallError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(FanwallError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FanwallError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FanwallError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
