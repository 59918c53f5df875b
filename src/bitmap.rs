//! 位图与异步图片加载

use crate::{Color, RenderError, Result};
use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use image::RgbaImage;
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 网络图片的最大字节数
const MAX_DOWNLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// 解码后的 RGBA 位图，克隆只增加引用计数
#[derive(Clone)]
pub struct Bitmap {
    image: Arc<RgbaImage>,
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { image: Arc::new(image) }
    }

    /// 纯色位图
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::new(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([color.r, color.g, color.b, color.a]),
        ))
    }

    /// 解码 PNG/JPEG/WebP 等格式
    pub fn decode(locator: &str, bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|source| RenderError::ImageDecode {
            locator: locator.to_string(),
            source,
        })?;
        Ok(Self::new(img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

pub type LoadFuture = LocalBoxFuture<'static, Result<Bitmap>>;

/// 图片加载器，按定位符（URL 或路径）异步产出位图
pub trait ImageLoader {
    fn load(&self, locator: &str) -> LoadFuture;
}

fn load_error(locator: &str, reason: impl Into<String>) -> RenderError {
    RenderError::ImageLoad {
        locator: locator.to_string(),
        reason: reason.into(),
    }
}

/// 默认加载器：每次加载在后台线程完成下载/读取和解码，结果按定位符缓存
#[derive(Clone)]
pub struct ThreadedImageLoader {
    cache: Arc<Mutex<HashMap<String, Bitmap>>>,
    timeout: Duration,
}

impl ThreadedImageLoader {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn cached(&self, locator: &str) -> Option<Bitmap> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(locator)
            .cloned()
    }

    /// 读取原始字节：http(s) 走网络，其余当作本地路径
    fn fetch(locator: &str, timeout: Duration) -> Result<Vec<u8>> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            let response = ureq::get(locator)
                .timeout(timeout)
                .call()
                .map_err(|e| load_error(locator, e.to_string()))?;
            let mut bytes = Vec::new();
            response
                .into_reader()
                .take(MAX_DOWNLOAD_BYTES)
                .read_to_end(&mut bytes)
                .map_err(|e| load_error(locator, e.to_string()))?;
            Ok(bytes)
        } else {
            std::fs::read(locator).map_err(|e| load_error(locator, e.to_string()))
        }
    }
}

impl Default for ThreadedImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for ThreadedImageLoader {
    fn load(&self, locator: &str) -> LoadFuture {
        if locator.is_empty() {
            return future::ready(Err(load_error(locator, "empty image locator"))).boxed_local();
        }
        if let Some(bitmap) = self.cached(locator) {
            return future::ready(Ok(bitmap)).boxed_local();
        }

        let (tx, rx) = oneshot::channel();
        let owned = locator.to_string();
        let cache = Arc::clone(&self.cache);
        let timeout = self.timeout;
        std::thread::spawn(move || {
            let result = Self::fetch(&owned, timeout).and_then(|bytes| Bitmap::decode(&owned, &bytes));
            match &result {
                Ok(bitmap) => {
                    log::debug!("loaded image {} ({}x{})", owned, bitmap.width(), bitmap.height());
                    cache
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .insert(owned.clone(), bitmap.clone());
                }
                Err(e) => log::warn!("{}", e),
            }
            // 接收端已丢弃说明测量被放弃，结果直接丢掉
            let _ = tx.send(result);
        });

        let locator = locator.to_string();
        async move {
            rx.await
                .map_err(|_| load_error(&locator, "loader thread exited without a result"))?
        }
        .boxed_local()
    }
}

/// 预先注册好的内存位图，适合内置资源和测试
#[derive(Default, Clone)]
pub struct MemoryImageLoader {
    images: HashMap<String, Bitmap>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: impl Into<String>, bitmap: Bitmap) {
        self.images.insert(locator.into(), bitmap);
    }

    pub fn with(mut self, locator: impl Into<String>, bitmap: Bitmap) -> Self {
        self.insert(locator, bitmap);
        self
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, locator: &str) -> LoadFuture {
        let result = self
            .images
            .get(locator)
            .cloned()
            .ok_or_else(|| load_error(locator, "no such image registered"));
        future::ready(result).boxed_local()
    }
}
