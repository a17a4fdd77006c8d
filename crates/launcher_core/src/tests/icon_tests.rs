use super::*;
use shared::domain::{BookmarkId, CategoryId, DEFAULT_CATEGORY_COLOR};

fn category(default_symbol: Option<&str>) -> Category {
    Category {
        id: CategoryId(1),
        name: "Dev".into(),
        hex_color: DEFAULT_CATEGORY_COLOR.into(),
        default_symbol: default_symbol.map(str::to_string),
        sort_order: 0,
        bookmarks: Vec::new(),
    }
}

fn bookmark(icon_type: IconType) -> Bookmark {
    Bookmark {
        id: Some(BookmarkId(10)),
        title: "GitHub".into(),
        url: "https://github.com".into(),
        category_id: CategoryId(1),
        icon_type,
        symbol_name: None,
        icon_url: None,
        hex_color: None,
        sort_order: 0,
    }
}

fn symbol(name: &str) -> IconRef {
    IconRef::Symbol(SymbolIcon::new(name))
}

#[test]
fn custom_url_wins_over_symbol_name() {
    let mut b = bookmark(IconType::Custom);
    b.icon_url = Some("http://x/y.png".into());
    b.symbol_name = Some("home".into());

    let icon = resolve(&b, &category(Some("star")), &SymbolCatalog::builtin());
    assert_eq!(
        icon,
        IconRef::Image {
            url: "http://x/y.png".into()
        }
    );
}

#[test]
fn custom_without_url_falls_through_to_category_symbol() {
    let mut b = bookmark(IconType::Custom);
    b.icon_url = Some("   ".into());

    let icon = resolve(&b, &category(Some("star")), &SymbolCatalog::builtin());
    assert_eq!(icon, symbol("star"));
}

#[test]
fn unknown_symbol_falls_back_to_category_default() {
    let mut b = bookmark(IconType::Symbol);
    b.symbol_name = Some("doesnotexist".into());

    let icon = resolve(&b, &category(Some("star")), &SymbolCatalog::builtin());
    assert_eq!(icon, symbol("star"));
}

#[test]
fn own_symbol_resolves_through_alias() {
    let mut b = bookmark(IconType::Symbol);
    b.symbol_name = Some("DB".into());

    let icon = resolve(&b, &category(Some("star")), &SymbolCatalog::builtin());
    assert_eq!(icon, symbol("circle-stack"));
}

#[test]
fn generated_uses_first_character_of_title() {
    let icon = resolve(
        &bookmark(IconType::Generated),
        &category(Some("star")),
        &SymbolCatalog::builtin(),
    );
    assert_eq!(icon, IconRef::Glyph { text: "G".into() });

    let mut untitled = bookmark(IconType::Generated);
    untitled.title = String::new();
    let icon = resolve(&untitled, &category(None), &SymbolCatalog::builtin());
    assert_eq!(icon, IconRef::Glyph { text: "?".into() });
}

#[test]
fn generated_glyph_keeps_multibyte_initial() {
    let mut b = bookmark(IconType::Generated);
    b.title = "Élan".into();
    let icon = resolve(&b, &category(None), &SymbolCatalog::builtin());
    assert_eq!(icon, IconRef::Glyph { text: "É".into() });
}

#[test]
fn generated_glyph_takes_title_verbatim() {
    let mut b = bookmark(IconType::Generated);
    b.title = " Docs".into();
    let icon = resolve(&b, &category(None), &SymbolCatalog::builtin());
    assert_eq!(icon, IconRef::Glyph { text: " ".into() });
}

#[test]
fn generic_fallback_when_nothing_resolves() {
    let mut b = bookmark(IconType::Symbol);
    b.symbol_name = Some("doesnotexist".into());

    let icon = resolve(&b, &category(Some("alsomissing")), &SymbolCatalog::builtin());
    assert_eq!(icon, symbol(FALLBACK_SYMBOL));

    let icon = resolve(&bookmark(IconType::Favicon), &category(None), &SymbolCatalog::builtin());
    assert_eq!(icon, symbol(FALLBACK_SYMBOL));
}

#[test]
fn resolver_works_with_injected_lookup() {
    let only_home = |key: &str| (key == "home").then(|| SymbolIcon::new("house"));

    let mut b = bookmark(IconType::Symbol);
    b.symbol_name = Some("home".into());
    assert_eq!(resolve(&b, &category(None), &only_home), symbol("house"));

    b.symbol_name = Some("star".into());
    assert_eq!(
        resolve(&b, &category(None), &only_home),
        symbol(FALLBACK_SYMBOL)
    );
}

#[test]
fn catalog_lookup_is_case_insensitive_and_trims() {
    let catalog = SymbolCatalog::builtin();
    assert_eq!(catalog.lookup("  Home "), Some(SymbolIcon::new("home")));
    assert_eq!(catalog.lookup("Settings"), Some(SymbolIcon::new("cog-6-tooth")));
    assert_eq!(catalog.lookup("rocket"), Some(SymbolIcon::new("rocket-launch")));
    assert_eq!(catalog.lookup(""), None);
    assert_eq!(catalog.lookup("doesnotexist"), None);
}

#[test]
fn catalog_accepts_component_style_names() {
    let catalog = SymbolCatalog::builtin();
    assert_eq!(
        catalog.lookup("AcademicCapIcon"),
        Some(SymbolIcon::new("academic-cap"))
    );
    assert_eq!(catalog.lookup("Cog6Tooth"), Some(SymbolIcon::new("cog-6-tooth")));
}

#[test]
fn empty_catalog_still_renders_fallback() {
    let catalog = SymbolCatalog::empty();
    assert!(catalog.contains(FALLBACK_SYMBOL));
    assert_eq!(catalog.lookup("home"), None);
    assert_eq!(catalog.lookup("Bookmark"), Some(SymbolIcon::new(FALLBACK_SYMBOL)));
}

#[test]
fn configured_aliases_and_symbols_extend_catalog() {
    let mut catalog = SymbolCatalog::builtin();
    catalog.extend_symbols(["Squares-2x2"]);
    catalog.insert_alias("Dashboard", "squares-2x2");
    assert_eq!(catalog.lookup("dashboard"), Some(SymbolIcon::new("squares-2x2")));
}

#[test]
fn pascal_to_kebab_splits_words_and_digits() {
    assert_eq!(pascal_to_kebab("ChatBubbleLeftRight"), "chat-bubble-left-right");
    assert_eq!(pascal_to_kebab("Bars3"), "bars-3");
    assert_eq!(pascal_to_kebab("home"), "home");
}

#[test]
fn icon_ref_serializes_with_kind_tag() {
    let value = serde_json::to_value(symbol("star")).expect("json");
    assert_eq!(value["kind"], "symbol");
    assert_eq!(value["name"], "star");

    let value = serde_json::to_value(IconRef::Glyph { text: "G".into() }).expect("json");
    assert_eq!(value["kind"], "glyph");
}
