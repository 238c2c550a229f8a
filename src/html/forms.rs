//! HTML form extraction
//!
//! Lists every form with its inputs, then every input that sits outside
//! any form.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());

/// Input-like elements, in report order
static INPUT_KINDS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        Selector::parse("input").unwrap(),
        Selector::parse("textarea").unwrap(),
        Selector::parse("select").unwrap(),
    ]
});

const FORMS_BANNER: &str = "========================= FORMS =======================";
const STANDALONE_BANNER: &str = "=================== STANDALONE INPUTS =====================";

/// One input, textarea or select element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputInfo {
    pub tag: String,
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub other_attrs: BTreeMap<String, String>,
}

impl InputInfo {
    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            tag: element.value().name().to_string(),
            name: attr_or_empty(element, "name"),
            input_type: attr_or_empty(element, "type"),
            other_attrs: attrs_without(element, &["name", "type"]),
        }
    }
}

/// One form and the inputs it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormInfo {
    pub action: String,
    pub method: String,
    pub other_attrs: BTreeMap<String, String>,
    pub inputs: Vec<InputInfo>,
}

/// Forms and standalone inputs found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormReport {
    pub forms: Vec<FormInfo>,
    pub standalone_inputs: Vec<InputInfo>,
}

/// Extract forms and standalone inputs from an HTML document
pub fn extract_forms(html: &str) -> FormReport {
    let document = Html::parse_document(html);

    let forms = document
        .select(&FORM)
        .map(|form| FormInfo {
            action: attr_or_empty(form, "action"),
            method: attr_or_empty(form, "method"),
            other_attrs: attrs_without(form, &["action", "method"]),
            inputs: INPUT_KINDS
                .iter()
                .flat_map(|selector| form.select(selector))
                .map(InputInfo::from_element)
                .collect(),
        })
        .collect();

    let standalone_inputs = INPUT_KINDS
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter(|element| !inside_form(*element))
        .map(InputInfo::from_element)
        .collect();

    FormReport {
        forms,
        standalone_inputs,
    }
}

fn inside_form(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "form")
}

fn attr_or_empty(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

fn attrs_without(element: ElementRef<'_>, excluded: &[&str]) -> BTreeMap<String, String> {
    element
        .value()
        .attrs()
        .filter(|(key, _)| !excluded.contains(key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

struct Attrs<'a>(&'a BTreeMap<String, String>);

impl fmt::Display for Attrs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", Quoted(key), Quoted(value))?;
        }
        f.write_str("}")
    }
}

/// Single-quoted string literal, switching to double quotes when the text
/// contains a single quote and no double quote
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.0.contains('\'') && !self.0.contains('"') {
            '"'
        } else {
            '\''
        };

        write!(f, "{quote}")?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                c if c == quote => write!(f, "\\{c}")?,
                c => write!(f, "{c}")?,
            }
        }
        write!(f, "{quote}")
    }
}

fn write_input(f: &mut fmt::Formatter<'_>, number: usize, input: &InputInfo, indent: usize) -> fmt::Result {
    let pad = " ".repeat(indent);
    write!(
        f,
        "\n{pad}{number}. input\
         \n{pad}    tag: {}\
         \n{pad}    name: {}\
         \n{pad}    type: {}\
         \n{pad}    other attrs: {}",
        input.tag,
        input.name,
        input.input_type,
        Attrs(&input.other_attrs)
    )
}

impl fmt::Display for FormReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FORMS_BANNER)?;

        for (i, form) in self.forms.iter().enumerate() {
            write!(
                f,
                "\n    {}. form\
                 \n        action: {}\
                 \n        method: {}\
                 \n        other attrs: {}\
                 \n        inputs:",
                i + 1,
                form.action,
                form.method,
                Attrs(&form.other_attrs)
            )?;

            for (z, input) in form.inputs.iter().enumerate() {
                write_input(f, z + 1, input, 12)?;
            }
        }

        write!(f, "\n\n{STANDALONE_BANNER}")?;

        for (i, input) in self.standalone_inputs.iter().enumerate() {
            write_input(f, i + 1, input, 4)?;
        }

        Ok(())
    }
}
