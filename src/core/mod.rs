pub mod error;
pub mod value;
pub mod vertex_edge_path;

// 错误和结果类型
pub use error::{ClientError, ClientResult, DecodeError, DecodeResult, TransportError};

// 核心数据类型
pub use value::*;
pub use vertex_edge_path::{Edge, Node, Path};
