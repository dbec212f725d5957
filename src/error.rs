use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid config json: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("audio: {0}")]
    Audio(String),

    #[error("dom: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for wasm_bindgen::JsValue {
    fn from(e: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
