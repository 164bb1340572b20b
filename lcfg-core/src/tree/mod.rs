//! 设置树模块
//!
//! - `document`: arena 文档与修改操作
//! - `setting`: 借用视图与 serde 序列化
//! - `path`: 路径语法

pub mod document;
pub mod error;
pub mod path;
pub mod setting;
pub mod value;

pub use document::{Document, SettingId};
pub use error::SettingError;
pub use path::{is_valid_name, parse_path, PathSegment};
pub use setting::Setting;
pub use value::{FromValue, SettingType, Value};
