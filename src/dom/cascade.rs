//! Static style resolution for pages loaded without a browser
//!
//! This is a small approximation of the browser cascade: `<style>` blocks and
//! `style` attributes are applied in source order on top of a handful of
//! user-agent defaults, with the inherited text properties flowing from parent
//! to child. Specificity is not computed. External stylesheets are never
//! fetched, so they behave like cross-origin sheets: invisible.

use crate::color::find_color_token;
use crate::dom::{ComputedStyle, Size, StyleRule, parse_absolute_length, parse_px};
use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

const ROOT_FONT_SIZE: f64 = 16.0;
const DEFAULT_FONT_FAMILY: &str = "\"Times New Roman\"";
const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// At-rules whose blocks contain ordinary style rules
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document"];

const BORDER_STYLES: &[&str] = &[
    "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];

const INHERITED: &[&str] = &["color", "font-family", "font-size", "font-weight", "line-height"];

static URL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"[^"]*"|'[^']*'|[^)]*)\s*\)"#).expect("valid url regex")
});

static FUNCTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z-]+\([^)]*\)").expect("valid function regex"));

static STYLE_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("style").expect("Failed to parse style selector - this is a bug"));

static STYLESHEET_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="stylesheet"]"#)
        .expect("Failed to parse stylesheet link selector - this is a bug")
});

/// Parses a stylesheet into style rules, descending into grouping at-rules
pub fn parse_stylesheet(css: &str) -> Vec<StyleRule> {
    let mut input = ParserInput::new(css);
    collect_rules(&mut Parser::new(&mut input))
}

/// Parses a declaration block (or a `style` attribute) into longhand properties.
///
/// The `background`, `border`, `border-top`, `border-color` and `border-width`
/// shorthands are expanded into the longhands the analyzers read. Later
/// declarations win.
pub fn parse_declarations(block: &str) -> IndexMap<String, String> {
    let mut input = ParserInput::new(block);
    collect_declarations(&mut Parser::new(&mut input))
}

fn collect_rules(input: &mut Parser<'_, '_>) -> Vec<StyleRule> {
    let mut rules = Vec::new();
    for result in StyleSheetParser::new(input, &mut RuleCollector) {
        match result {
            Ok(found) => rules.extend(found),
            Err((_, source)) => ::log::trace!("Skipping invalid rule `{}`", source.trim()),
        }
    }
    rules
}

fn collect_declarations(input: &mut Parser<'_, '_>) -> IndexMap<String, String> {
    let mut declarations = IndexMap::new();
    for result in RuleBodyParser::new(input, &mut DeclarationCollector) {
        match result {
            Ok((property, value)) => {
                let value = strip_important(&value);
                if !value.is_empty() {
                    expand_shorthand(&mut declarations, &property, value);
                }
            }
            Err((_, source)) => ::log::trace!("Skipping invalid declaration `{}`", source.trim()),
        }
    }
    declarations
}

/// Consumes what is left of a delimited parser, returning the source it spanned
fn consume_remaining<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start)
}

/// Turns top-level and grouped style rules into [`StyleRule`]s
struct RuleCollector;

impl<'i> QualifiedRuleParser<'i> for RuleCollector {
    type Prelude = String;
    type QualifiedRule = Vec<StyleRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<String, ParseError<'i, ()>> {
        let selector = consume_remaining(input);
        Ok(selector.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn parse_block<'t>(
        &mut self,
        selector: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Vec<StyleRule>, ParseError<'i, ()>> {
        let declarations = collect_declarations(input);
        if selector.is_empty() || declarations.is_empty() {
            ::log::trace!("Skipping rule `{}` without declarations", selector);
            return Ok(Vec::new());
        }
        Ok(vec![StyleRule {
            selector,
            declarations,
        }])
    }
}

impl<'i> AtRuleParser<'i> for RuleCollector {
    type Prelude = String;
    type AtRule = Vec<StyleRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<String, ParseError<'i, ()>> {
        consume_remaining(input);
        Ok(name.to_ascii_lowercase())
    }

    /// Statement at-rules such as `@import` carry no style rules
    fn rule_without_block(
        &mut self,
        _name: String,
        _start: &ParserState,
    ) -> Result<Vec<StyleRule>, ()> {
        Ok(Vec::new())
    }

    fn parse_block<'t>(
        &mut self,
        name: String,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Vec<StyleRule>, ParseError<'i, ()>> {
        if GROUPING_AT_RULES.contains(&name.as_str()) {
            return Ok(collect_rules(input));
        }
        ::log::trace!("Skipping @{} block", name);
        consume_remaining(input);
        Ok(Vec::new())
    }
}

/// Yields `(property, value)` pairs of a declaration block, property lowercased
struct DeclarationCollector;

impl<'i> DeclarationParser<'i> for DeclarationCollector {
    type Declaration = (String, String);
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<(String, String), ParseError<'i, ()>> {
        let value = consume_remaining(input).trim().to_string();
        Ok((name.to_ascii_lowercase(), value))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for DeclarationCollector {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn strip_important(value: &str) -> &str {
    match value.to_ascii_lowercase().find("!important") {
        Some(pos) => value[..pos].trim(),
        None => value,
    }
}

fn expand_shorthand(out: &mut IndexMap<String, String>, property: &str, value: &str) {
    match property {
        "background" => {
            let color = find_color_token(value).unwrap_or_else(|| "transparent".to_string());
            out.insert("background-color".to_string(), color);
            out.insert("background-image".to_string(), background_image_of(value));
        }
        "border" | "border-top" => {
            let color = find_color_token(value).unwrap_or_else(|| "currentcolor".to_string());
            if property == "border" {
                out.insert("border-color".to_string(), color.clone());
            }
            out.insert("border-top-color".to_string(), color);
            out.insert("border-top-width".to_string(), border_width_of(value));
        }
        "border-color" => {
            if let Some(top) = find_color_token(value) {
                out.insert("border-top-color".to_string(), top);
            }
            out.insert("border-color".to_string(), value.to_string());
        }
        "border-width" => {
            if let Some(top) = value.split_whitespace().next().and_then(width_token) {
                out.insert("border-top-width".to_string(), top);
            }
        }
        _ => {
            out.insert(property.to_string(), value.to_string());
        }
    }
}

fn background_image_of(value: &str) -> String {
    if value.to_ascii_lowercase().contains("gradient") {
        return value.to_string();
    }
    URL_TOKEN
        .find(value)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "none".to_string())
}

/// Computed top border width of a `border` shorthand; no style means no border
fn border_width_of(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let stripped = FUNCTION_TOKEN.replace_all(&lower, " ");
    let tokens: Vec<&str> = stripped.split_whitespace().collect();

    if !tokens.iter().any(|t| BORDER_STYLES.contains(t)) {
        return "0px".to_string();
    }
    tokens
        .iter()
        .find_map(|t| width_token(t))
        .unwrap_or_else(|| "3px".to_string())
}

fn width_token(token: &str) -> Option<String> {
    match token {
        "thin" => Some("1px".to_string()),
        "medium" => Some("3px".to_string()),
        "thick" => Some("5px".to_string()),
        _ => parse_length(token, ROOT_FONT_SIZE, 0.0).map(format_px),
    }
}

/// Parses a CSS length to px. `em` and `%` resolve against the given bases.
fn parse_length(value: &str, em_base: f64, percent_base: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if value == "0" {
        return Some(0.0);
    }

    let number = |s: &str| s.trim().parse::<f64>().ok().filter(|n| n.is_finite());

    if let Some(n) = value.strip_suffix("rem") {
        return number(n).map(|n| n * ROOT_FONT_SIZE);
    }
    if let Some(n) = value.strip_suffix("em") {
        return number(n).map(|n| n * em_base);
    }
    if let Some(n) = value.strip_suffix('%') {
        return number(n).map(|n| n / 100.0 * percent_base);
    }
    parse_absolute_length(&value)
}

fn format_px(px: f64) -> String {
    format!("{}px", (px * 100.0).round() / 100.0)
}

/// Collects rules from every inline `<style>` block, in document order
pub(crate) fn collect_stylesheets(html: &Html) -> Vec<StyleRule> {
    let external = html.select(&STYLESHEET_LINK).count();
    if external > 0 {
        ::log::debug!("Ignoring {} external stylesheet(s) in static page", external);
    }

    html.select(&STYLE_ELEMENT)
        .flat_map(|style| parse_stylesheet(&style.text().collect::<String>()))
        .collect()
}

/// Computes style and box size for every element in `order`
pub(crate) fn resolve(
    html: &Html,
    order: &[ego_tree::NodeId],
    rules: &[StyleRule],
) -> (Vec<ComputedStyle>, Vec<Option<Size>>) {
    let compiled: Vec<(Selector, &StyleRule)> = rules
        .iter()
        .filter_map(|rule| match Selector::parse(&rule.selector) {
            Ok(selector) => Some((selector, rule)),
            Err(_) => {
                ::log::trace!("Selector `{}` does not cascade", rule.selector);
                None
            }
        })
        .collect();

    let mut position: HashMap<ego_tree::NodeId, usize> = HashMap::with_capacity(order.len());
    let mut styles: Vec<ComputedStyle> = Vec::with_capacity(order.len());
    let mut boxes = Vec::with_capacity(order.len());

    for (i, id) in order.iter().enumerate() {
        position.insert(*id, i);
        let Some(element) = html.tree.get(*id).and_then(ElementRef::wrap) else {
            styles.push(ComputedStyle::default());
            boxes.push(None);
            continue;
        };

        let parent = element
            .parent()
            .and_then(|p| position.get(&p.id()))
            .map(|&p| styles[p].clone())
            .unwrap_or_else(root_style);

        let mut resolver = Resolver::new(&parent);
        resolver.apply_user_agent(&element);
        for (selector, rule) in &compiled {
            if selector.matches(&element) {
                resolver.apply_all(&rule.declarations);
            }
        }
        if let Some(inline) = element.value().attr("style") {
            resolver.apply_all(&parse_declarations(inline));
        }

        boxes.push(resolver.size(&element));
        styles.push(resolver.finish());
    }

    (styles, boxes)
}

/// Initial values, as seen on the document element before any rule applies
fn root_style() -> ComputedStyle {
    ComputedStyle {
        background_color: TRANSPARENT.to_string(),
        background_image: "none".to_string(),
        color: "rgb(0, 0, 0)".to_string(),
        border_top_color: "currentcolor".to_string(),
        border_top_width: "0px".to_string(),
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_size: format_px(ROOT_FONT_SIZE),
        font_weight: "400".to_string(),
        line_height: "normal".to_string(),
    }
}

struct Resolver<'a> {
    parent: &'a ComputedStyle,
    parent_font_px: f64,
    style: ComputedStyle,
    width: Option<f64>,
    height: Option<f64>,
}

impl<'a> Resolver<'a> {
    fn new(parent: &'a ComputedStyle) -> Self {
        let initial = root_style();
        let style = ComputedStyle {
            color: parent.color.clone(),
            font_family: parent.font_family.clone(),
            font_size: parent.font_size.clone(),
            font_weight: parent.font_weight.clone(),
            line_height: parent.line_height.clone(),
            ..initial
        };
        Self {
            parent,
            parent_font_px: parse_px(&parent.font_size).unwrap_or(ROOT_FONT_SIZE),
            style,
            width: None,
            height: None,
        }
    }

    fn apply_user_agent(&mut self, element: &ElementRef) {
        let tag = element.value().name();
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let size = match tag {
                    "h1" => "2em",
                    "h2" => "1.5em",
                    "h3" => "1.17em",
                    "h4" => "1em",
                    "h5" => "0.83em",
                    _ => "0.67em",
                };
                self.apply("font-size", size);
                self.apply("font-weight", "bold");
            }
            "b" | "strong" | "th" => self.apply("font-weight", "bold"),
            "a" if element.value().attr("href").is_some() => self.apply("color", "rgb(0, 0, 238)"),
            "button" => {
                self.apply("background-color", "rgb(239, 239, 239)");
                self.apply("color", "rgb(0, 0, 0)");
                self.apply("border-top-width", "2px");
                self.apply("border-top-color", "rgb(118, 118, 118)");
            }
            "input" | "textarea" | "select" => {
                self.apply("border-top-width", "2px");
                self.apply("border-top-color", "rgb(118, 118, 118)");
                if matches!(element.value().attr("type"), Some("submit" | "button" | "reset")) {
                    self.apply("background-color", "rgb(239, 239, 239)");
                }
            }
            "code" | "pre" | "kbd" | "samp" => self.apply("font-family", "monospace"),
            _ => {}
        }
    }

    fn apply_all(&mut self, declarations: &IndexMap<String, String>) {
        for (property, value) in declarations {
            self.apply(property, value);
        }
    }

    fn apply(&mut self, property: &str, value: &str) {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "inherit" => return self.inherit(property),
            "initial" => return self.reset(property),
            "unset" if INHERITED.contains(&property) => return self.inherit(property),
            "unset" => return self.reset(property),
            _ => {}
        }

        let value = value.trim().to_string();
        match property {
            "color" if lower == "currentcolor" => self.style.color = self.parent.color.clone(),
            "color" => self.style.color = value,
            "background-color" => self.style.background_color = value,
            "background-image" => self.style.background_image = value,
            "border-top-color" => self.style.border_top_color = value,
            "border-top-width" => self.style.border_top_width = value,
            "font-family" => self.style.font_family = value,
            "font-size" => self.style.font_size = format_px(self.font_size_px(&lower)),
            "font-weight" => self.style.font_weight = self.font_weight(&lower),
            "line-height" => self.style.line_height = value,
            "width" => self.width = parse_length(&lower, self.parent_font_px, f64::NAN),
            "height" => self.height = parse_length(&lower, self.parent_font_px, f64::NAN),
            _ => {}
        }
    }

    fn inherit(&mut self, property: &str) {
        let parent = self.parent;
        match property {
            "color" => self.style.color = parent.color.clone(),
            "background-color" => self.style.background_color = parent.background_color.clone(),
            "background-image" => self.style.background_image = parent.background_image.clone(),
            "border-top-color" => self.style.border_top_color = parent.border_top_color.clone(),
            "border-top-width" => self.style.border_top_width = parent.border_top_width.clone(),
            "font-family" => self.style.font_family = parent.font_family.clone(),
            "font-size" => self.style.font_size = parent.font_size.clone(),
            "font-weight" => self.style.font_weight = parent.font_weight.clone(),
            "line-height" => self.style.line_height = parent.line_height.clone(),
            _ => {}
        }
    }

    fn reset(&mut self, property: &str) {
        let initial = root_style();
        match property {
            "color" => self.style.color = initial.color,
            "background-color" => self.style.background_color = initial.background_color,
            "background-image" => self.style.background_image = initial.background_image,
            "border-top-color" => self.style.border_top_color = initial.border_top_color,
            "border-top-width" => self.style.border_top_width = initial.border_top_width,
            "font-family" => self.style.font_family = initial.font_family,
            "font-size" => self.style.font_size = initial.font_size,
            "font-weight" => self.style.font_weight = initial.font_weight,
            "line-height" => self.style.line_height = initial.line_height,
            _ => {}
        }
    }

    fn font_size_px(&self, value: &str) -> f64 {
        let parent = self.parent_font_px;
        match value {
            "xx-small" => 9.0,
            "x-small" => 10.0,
            "small" => 13.0,
            "medium" => 16.0,
            "large" => 18.0,
            "x-large" => 24.0,
            "xx-large" => 32.0,
            "xxx-large" => 48.0,
            "smaller" => parent / 1.2,
            "larger" => parent * 1.2,
            _ => parse_length(value, parent, parent).unwrap_or(parent),
        }
    }

    fn font_weight(&self, value: &str) -> String {
        let parent: u32 = self.parent.font_weight.parse().unwrap_or(400);
        let weight = match value {
            "normal" => 400,
            "bold" => 700,
            "bolder" if parent < 400 => 400,
            "bolder" if parent < 600 => 700,
            "bolder" => 900,
            "lighter" if parent >= 800 => 700,
            "lighter" if parent >= 600 => 400,
            "lighter" => 100,
            _ => value.parse::<f64>().map(|w| w.round() as u32).unwrap_or(parent),
        };
        weight.to_string()
    }

    /// Declared px size wins over presentational `width`/`height` attributes
    fn size(&self, element: &ElementRef) -> Option<Size> {
        let attr = |name: &str| {
            element
                .value()
                .attr(name)
                .and_then(parse_px)
                .filter(|n| *n >= 0.0)
        };
        let width = self.width.filter(|w| w.is_finite()).or_else(|| attr("width"))?;
        let height = self.height.filter(|h| h.is_finite()).or_else(|| attr("height"))?;
        Some(Size::new(width, height))
    }

    fn finish(mut self) -> ComputedStyle {
        if self.style.border_top_color.eq_ignore_ascii_case("currentcolor") {
            self.style.border_top_color = self.style.color.clone();
        }

        let font_px = parse_px(&self.style.font_size).unwrap_or(ROOT_FONT_SIZE);
        let line_height = self.style.line_height.trim().to_ascii_lowercase();
        let is_number = line_height.parse::<f64>().is_ok();
        if line_height != "normal" && !is_number {
            if let Some(px) = parse_length(&line_height, font_px, font_px) {
                self.style.line_height = format_px(px);
            }
        }

        self.style
    }
}
