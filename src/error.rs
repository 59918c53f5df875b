//! 错误类型

/// 渲染引擎错误
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// 在测量完成之前调用了绘制
    #[error("draw called before measure completed")]
    NotMeasured,

    #[error("failed to load image `{locator}`: {reason}")]
    ImageLoad { locator: String, reason: String },

    #[error("failed to decode image `{locator}`: {source}")]
    ImageDecode {
        locator: String,
        #[source]
        source: image::ImageError,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("invalid scene config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("raster error: {0}")]
    Raster(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
