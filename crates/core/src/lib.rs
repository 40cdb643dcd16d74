//! # pixdrop Core
//!
//! アップロード画像の検証・正規化と、保存期間の判定を実装する。
//! ファイルシステムやHTTPには触れない純粋な処理のみを持つ。
//!
//! ## 処理フロー
//! 1. マジックバイトから実際のフォーマットを判定する（宣言値は信用しない）
//! 2. ランダムな保存名を生成する
//! 3. フォーマットに応じてデコードする
//! 4. GIFはフレームを複製し固定ディレイ・無限ループで再エンコード、
//!    JPEGはEXIF Orientationを画素に適用して再エンコードする

mod expiry;
mod naming;
mod normalize;
mod sniff;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

use std::str::FromStr;

use pixdrop_types::ImageKind;

pub use expiry::{file_age, is_expired, retention_from_days, SECONDS_PER_DAY};
pub use naming::{generate_storage_name, sanitize_requested_name};
pub use normalize::{
    normalize_gif, normalize_jpeg, FRAME_DELAY_MS, JPEG_QUALITY, MAX_DECODED_GIF_BYTES,
};
pub use sniff::{sniff_format, SniffedFormat};

/// Coreモジュールのエラー型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// マジックバイトがJPEGにもGIFにも一致しない
    #[error("画像フォーマットを判定できません")]
    UnknownFormat,
    /// 判定は通ったがストリームが壊れている
    #[error("画像のデコードに失敗しました: {0}")]
    Decode(String),
    /// 正規化後の再エンコードに失敗
    #[error("画像のエンコードに失敗しました: {0}")]
    Encode(String),
    /// 静止GIFを拒否するポリシーで静止GIFを受け取った
    #[error("アニメーションではないGIFは受け付けません")]
    NotAnimated,
}

/// 1フレームしかないGIFの扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticGifPolicy {
    /// 何も保存せずに成功扱いとする（URIは返るがファイルは存在しない）。
    #[default]
    Drop,
    /// `CoreError::NotAnimated` で拒否する。
    Reject,
    /// アニメーションと同じ正規化をかけて保存する。
    Store,
}

impl FromStr for StaticGifPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(StaticGifPolicy::Drop),
            "reject" => Ok(StaticGifPolicy::Reject),
            "store" => Ok(StaticGifPolicy::Store),
            other => Err(format!(
                "不明な静止GIFポリシー: {other} (drop / reject / store のいずれか)"
            )),
        }
    }
}

/// 保存直前まで処理したアップロード。
#[derive(Debug)]
pub struct PreparedUpload {
    /// 生成された保存名（`<uuid>.<jpeg|gif>`）
    pub name: String,
    /// マジックバイトから判定した種別
    pub kind: ImageKind,
    /// 保存すべき正規化済みバイト列。
    /// `None` の場合は書き込みを行わない（静止GIFの `Drop` ポリシー）。
    pub payload: Option<Vec<u8>>,
}

/// フォーマット判定からエンコードまでを一括で行う。
///
/// 保存名はデコード前に確定する。デコードに失敗した場合は何も残らない。
pub fn prepare_upload(
    data: &[u8],
    static_gif: StaticGifPolicy,
) -> Result<PreparedUpload, CoreError> {
    let kind = sniff_format(data)
        .image_kind()
        .ok_or(CoreError::UnknownFormat)?;

    let name = generate_storage_name(kind);

    let payload = match kind {
        ImageKind::Gif => normalize_gif(data, static_gif)?,
        ImageKind::Jpeg => Some(normalize_jpeg(data)?),
    };

    Ok(PreparedUpload {
        name,
        kind,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_upload_rejects_unknown_bytes() {
        for data in [&b"hello world"[..], b"\x89PNG\r\n\x1a\n", b"\xff\xd8", b"GIF8"] {
            assert!(matches!(
                prepare_upload(data, StaticGifPolicy::Drop),
                Err(CoreError::UnknownFormat)
            ));
        }
    }

    #[test]
    fn test_prepare_upload_corrupt_jpeg_is_decode_error() {
        let mut data = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00".to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            prepare_upload(&data, StaticGifPolicy::Drop),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn test_prepare_upload_corrupt_gif_is_decode_error() {
        let data = b"GIF89a\x01\x00\x01\x00garbage-that-is-not-a-gif".to_vec();
        assert!(matches!(
            prepare_upload(&data, StaticGifPolicy::Drop),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn test_prepare_upload_jpeg() {
        let data = fixtures::jpeg_with_orientation(1);
        let prepared = prepare_upload(&data, StaticGifPolicy::Drop).unwrap();
        assert_eq!(prepared.kind, ImageKind::Jpeg);
        assert!(prepared.name.ends_with(".jpeg"));
        assert!(prepared.payload.is_some());
    }

    /// 静止GIFはDropポリシーで名前だけが生成され、保存対象は無い
    #[test]
    fn test_prepare_upload_static_gif_drop() {
        let data = fixtures::static_gif();
        let prepared = prepare_upload(&data, StaticGifPolicy::Drop).unwrap();
        assert_eq!(prepared.kind, ImageKind::Gif);
        assert!(prepared.name.ends_with(".gif"));
        assert!(prepared.payload.is_none());
    }

    #[test]
    fn test_prepare_upload_static_gif_reject_and_store() {
        let data = fixtures::static_gif();
        assert!(matches!(
            prepare_upload(&data, StaticGifPolicy::Reject),
            Err(CoreError::NotAnimated)
        ));
        let prepared = prepare_upload(&data, StaticGifPolicy::Store).unwrap();
        assert!(prepared.payload.is_some());
    }

    /// 判定はマジックバイトのみで行う（宣言値はここに届かない）
    #[test]
    fn test_prepare_upload_uses_sniffed_kind() {
        let data = fixtures::animated_gif(3, 200);
        let prepared = prepare_upload(&data, StaticGifPolicy::Drop).unwrap();
        assert_eq!(prepared.kind, ImageKind::Gif);
        assert!(prepared.payload.is_some());
    }

    #[test]
    fn test_static_gif_policy_from_str() {
        assert_eq!("drop".parse::<StaticGifPolicy>(), Ok(StaticGifPolicy::Drop));
        assert_eq!(" Reject ".parse::<StaticGifPolicy>(), Ok(StaticGifPolicy::Reject));
        assert_eq!("STORE".parse::<StaticGifPolicy>(), Ok(StaticGifPolicy::Store));
        assert!("keep".parse::<StaticGifPolicy>().is_err());
    }
}
