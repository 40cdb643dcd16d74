//! # 保存名の生成とサニタイズ

use pixdrop_types::ImageKind;

/// 新しい保存名を生成する。
///
/// UUIDv4（122ビットの乱数）に判定済みフォーマットの拡張子を付ける。
/// クライアントの入力は一切含めない。
pub fn generate_storage_name(kind: ImageKind) -> String {
    format!("{}{}", uuid::Uuid::new_v4(), kind.extension())
}

/// 取得要求のファイル名をベース名だけに切り詰める。
///
/// 最後の区切り文字より後ろだけを残す。末尾が区切り文字なら何も残らない。
/// 残りが空・`.`・`..` の場合は `None`。
pub fn sanitize_requested_name(requested: &str) -> Option<String> {
    // Windows形式の区切りも区切りとして扱う
    let base = requested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    match base {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_storage_name_shape() {
        let name = generate_storage_name(ImageKind::Jpeg);
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpeg");
        assert!(uuid::Uuid::parse_str(stem).is_ok());

        assert!(generate_storage_name(ImageKind::Gif).ends_with(".gif"));
    }

    #[test]
    fn test_generate_storage_name_unique() {
        let names: HashSet<String> = (0..1000)
            .map(|_| generate_storage_name(ImageKind::Gif))
            .collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_requested_name("a.gif").as_deref(), Some("a.gif"));
        assert_eq!(
            sanitize_requested_name("../../etc/passed").as_deref(),
            Some("passed")
        );
        assert_eq!(sanitize_requested_name("/etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(
            sanitize_requested_name("..\\..\\boot.ini").as_deref(),
            Some("boot.ini")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_results() {
        assert_eq!(sanitize_requested_name(""), None);
        assert_eq!(sanitize_requested_name("."), None);
        assert_eq!(sanitize_requested_name(".."), None);
        assert_eq!(sanitize_requested_name("a/.."), None);
        assert_eq!(sanitize_requested_name("/"), None);
    }

    /// 末尾の `.` や区切り文字は直前の成分に戻らない
    #[test]
    fn test_sanitize_trailing_component_is_kept_as_is() {
        assert_eq!(sanitize_requested_name("a/."), None);
        assert_eq!(sanitize_requested_name("x.jpeg/."), None);
        assert_eq!(sanitize_requested_name("dir/x.jpeg/"), None);
        assert_eq!(sanitize_requested_name("dir\\x.jpeg\\"), None);
        assert_eq!(sanitize_requested_name("./x.gif").as_deref(), Some("x.gif"));
    }
}
