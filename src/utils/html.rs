/// 解碼 HTML entity（tracker 部分 API 路由會回傳 `&amp;` 之類的字串）
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
