//! # HTTPエンドポイント
//!
//! - `PUT /<secret>/image.jpeg`, `PUT /<secret>/image.gif` — アップロード
//! - `GET /image/{name}` — 取得（期限切れは削除）
//! - `GET /` — 生存確認
//! - その他 — 200で `{"Not": "Found"}`

pub mod fetch;
pub mod index;
pub mod upload;

pub use fetch::handle_get_image;
pub use index::{handle_index, handle_not_found};
pub use upload::{handle_upload_gif, handle_upload_jpeg};
