//! 查詢字串與表單本體的組裝。
//!
//! 編碼採用 `application/x-www-form-urlencoded` 規則：空白轉成 `+`，
//! `A-Z a-z 0-9 * - . _` 保留，其餘位元組轉為 `%XX`。

use url::form_urlencoded;

/// 把參數附加到 URL 的查詢字串後。
///
/// 沒有參數時回傳原 URL；URL 已有 `?` 時以 `&` 接續既有查詢，
/// `#fragment` 保留在最後。
pub fn concat_url<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query = encode_form(params);
    if query.is_empty() {
        return url.to_string();
    }

    // 查詢字串必須放在 #fragment 之前
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let separator = match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    };

    match fragment {
        Some(fragment) => format!("{}{}{}#{}", base, separator, query, fragment),
        None => format!("{}{}{}", base, separator, query),
    }
}

/// 參數轉成表單本體 (`k1=v1&k2=v2`)，保留輸入順序
pub fn encode_form<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}
