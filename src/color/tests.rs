use super::*;

#[test]
fn test_to_hex_functional_syntaxes() {
    assert_eq!(to_hex("rgb(255, 0, 0)"), Some("#FF0000".to_string()));
    assert_eq!(to_hex("rgba(51, 102, 255, 0.5)"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("rgb(51 102 255 / 50%)"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("rgb(100%, 0%, 50%)"), Some("#FF0080".to_string()));
    assert_eq!(to_hex("hsl(0, 100%, 50%)"), Some("#FF0000".to_string()));
    assert_eq!(to_hex("hsl(120deg 100% 25%)"), Some("#008000".to_string()));
    assert_eq!(to_hex("hsla(240, 100%, 50%, 0.3)"), Some("#0000FF".to_string()));
    assert_eq!(to_hex("hsl(0.5turn, 100%, 50%)"), Some("#00FFFF".to_string()));
}

#[test]
fn test_to_hex_hex_and_named() {
    assert_eq!(to_hex("#36f"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("#36fa"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("#3366ff"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("#3366FF80"), Some("#3366FF".to_string()));
    assert_eq!(to_hex("RebeccaPurple"), Some("#663399".to_string()));
    assert_eq!(to_hex("white"), Some("#FFFFFF".to_string()));
}

#[test]
fn test_to_hex_rejects_garbage_and_keywords() {
    assert_eq!(to_hex("transparent"), None);
    assert_eq!(to_hex("inherit"), None);
    assert_eq!(to_hex(""), None);
    assert_eq!(to_hex("#12345"), None);
    assert_eq!(to_hex("#GGGGGG"), None);
    assert_eq!(to_hex("rgb(1, 2)"), None);
    assert_eq!(to_hex("notacolor"), None);
    assert_eq!(to_hex("url(red.png)"), None);
}

#[test]
fn test_is_valid_color() {
    assert!(is_valid_color("rgb(0, 0, 0)"));
    assert!(is_valid_color("#fff"));
    assert!(is_valid_color("rgba(0, 0, 0, 0.4)"));
    assert!(!is_valid_color("transparent"));
    assert!(!is_valid_color("rgba(0, 0, 0, 0)"));
    assert!(!is_valid_color("rgb(0 0 0 / 0%)"));
    assert!(!is_valid_color("#00000000"));
    assert!(!is_valid_color("initial"));
    assert!(!is_valid_color("inherit"));
    assert!(!is_valid_color("  "));
}

#[test]
fn test_neutrality() {
    assert!(is_neutral("#808080"));
    assert!(is_neutral("#000000"));
    assert!(is_neutral("#FFFFFF"));
    assert!(is_neutral("#F5F5F0"));
    assert!(!is_neutral("#FF0000"));
    assert!(!is_neutral("#3366FF"));
    assert!(!is_neutral("not-hex"));
    assert_eq!(saturation("#000000"), Some(0.0));
}

#[test]
fn test_find_color_token() {
    assert_eq!(find_color_token("#3366FF"), Some("#3366FF".to_string()));
    assert_eq!(
        find_color_token("url(img/red.png) no-repeat rgb(1, 2, 3)"),
        Some("rgb(1, 2, 3)".to_string())
    );
    assert_eq!(find_color_token("1px solid red"), Some("red".to_string()));
    assert_eq!(find_color_token("transparent"), Some("transparent".to_string()));
    assert_eq!(find_color_token("none"), None);
    assert_eq!(find_color_token("url(blue.png) center"), None);
}
