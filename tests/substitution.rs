//! 文本替换集成测试
//!
//! 在完整文档上验证替换规则、遍历范围和序列化结果

use retext::parsers::html::{serialize_document, text_content, walk};
use retext::{ReplacementTable, Substituter};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{body_text, builtin_substituter, element, host, tough_year_substituter};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>2020 Recap</title>
    <style>.y2020::after { content: "2020"; }</style>
</head>
<body>
    <h1>2020 Recap</h1>
    <p>In 2020 things were hard, and 2020 felt long.</p>
    <p>Nothing happened in 20201 or in x2020.</p>
    <script>var year = "2020";</script>
    <ul><li>first <b>2020</b></li><li>   </li></ul>
</body>
</html>"#;

#[test]
fn test_walk_rewrites_visible_text_only() {
    let host = host(ARTICLE);
    let body = host.body().unwrap();

    let rewritten = walk(&body, &tough_year_substituter());

    assert_eq!(rewritten, 3);
    assert_eq!(
        text_content(&element(&host, vec!["h1"])),
        "(a tough year) Recap"
    );
    assert_eq!(
        text_content(&element(&host, vec!["p"])),
        "In (a tough year) things were hard, and (a tough year) felt long."
    );
    assert_eq!(
        text_content(&element(&host, vec!["li", "b"])),
        "(a tough year)"
    );
    assert_eq!(
        text_content(&element(&host, vec!["script"])),
        r#"var year = "2020";"#
    );
    assert!(body_text(&host).contains("Nothing happened in 20201 or in x2020."));
}

#[test]
fn test_walk_does_not_touch_head() {
    let host = host(ARTICLE);
    walk(&host.body().unwrap(), &tough_year_substituter());

    assert_eq!(text_content(&element(&host, vec!["title"])), "2020 Recap");
    assert!(text_content(&element(&host, vec!["style"])).contains(r#""2020""#));
}

#[test]
fn test_second_walk_is_a_no_op() {
    let host = host(ARTICLE);
    let body = host.body().unwrap();
    let substituter = tough_year_substituter();

    walk(&body, &substituter);
    let once = serialize_document(host.dom(), "utf-8").unwrap();

    assert_eq!(walk(&body, &substituter), 0);
    let twice = serialize_document(host.dom(), "utf-8").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_document_without_matches_is_unchanged() {
    let html = "<html><head><title>Quiet</title></head><body><p>Nothing to see here.</p></body></html>";
    let host = host(html);
    let before = serialize_document(host.dom(), "utf-8").unwrap();

    assert_eq!(walk(&host.body().unwrap(), &builtin_substituter()), 0);
    assert_eq!(serialize_document(host.dom(), "utf-8").unwrap(), before);
}

#[test]
fn test_casing_follows_first_matched_character() {
    let table = ReplacementTable::from_toml_str(
        r#"
        supported = ["en"]
        default = "en"

        [languages.en.singular]
        terms = ["lockdown"]
        replacement = "quiet time"

        [languages.en.plural]
        terms = ["lockdowns"]
        replacement = "quiet times"
        "#,
    )
    .unwrap();
    let substituter = Substituter::new(&table, "en").unwrap();

    assert_eq!(
        substituter.substitute("Lockdown began. Another lockdown. LOCKDOWNS everywhere."),
        "Quiet time began. Another quiet time. Quiet times everywhere."
    );
    assert_eq!(substituter.substitute("lockdowns-lockdown"), "quiet times-quiet time");
}

#[test]
fn test_builtin_table_replaces_the_year() {
    let substituter = builtin_substituter();

    assert_eq!(
        substituter.substitute("Looking back at 2020."),
        "Looking back at (the year we would rather forget)."
    );
}

#[test]
fn test_terms_next_to_non_ascii_text_are_replaced() {
    let substituter = builtin_substituter();

    assert_eq!(
        substituter.substitute("在2020年"),
        "在(the year we would rather forget)年"
    );
    assert_eq!(
        substituter.substitute("2020年的回顾"),
        "(the year we would rather forget)年的回顾"
    );
    assert_eq!(
        substituter.substitute("café2020"),
        "café(the year we would rather forget)"
    );
}
