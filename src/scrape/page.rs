//! Conjugation page parsing
//!
//! A conjugation page holds one `div.box_conj` per tense or mood. Inside a
//! box, a `<b>` element names the form (`Viitor`, `Infinitiv`, ...) and each
//! `div.cont_conj` that follows holds one inflected form, or `-` when the
//! verb has none for that person.

use scraper::{ElementRef, Html, Selector};

/// Text the site shows for unknown verbs
pub const VERB_NOT_FOUND: &str = "Verbul nu a fost găsit.";

const CONTENT_BOX: &str = "div.box_conj";
const FORM_NAME_TAG: &str = "b";
const VERB_FORM_TAG: &str = "div";
const VERB_FORM_CLASS: &str = "cont_conj";

/// Forms of one verb, grouped by form name in page order
pub type ConjugationForms = Vec<(String, Vec<String>)>;

/// Check if an element names a form
pub fn is_form_name(element: &ElementRef<'_>) -> bool {
    element.value().name().eq_ignore_ascii_case(FORM_NAME_TAG)
}

/// Check if an element holds an inflected form
pub fn is_verb_form(element: &ElementRef<'_>) -> bool {
    if !element.value().name().eq_ignore_ascii_case(VERB_FORM_TAG) {
        return false;
    }
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.to_lowercase().contains(VERB_FORM_CLASS))
}

/// Read the form name and inflected forms of one content box
pub fn parse_verb_form(content: &ElementRef<'_>) -> (String, Vec<String>) {
    let mut form_name = String::new();
    let mut forms = Vec::new();

    for child in content.children().filter_map(ElementRef::wrap) {
        if is_form_name(&child) {
            form_name = child.text().collect::<String>().trim().to_string();
        }
        if is_verb_form(&child) {
            let text = child.text().collect::<String>();
            let text = text.trim();
            if text != "-" {
                forms.push(text.to_string());
            }
        }
    }

    (form_name, forms)
}

/// Parse a conjugation page
///
/// Returns `None` for the not-found page. A form name seen twice keeps its
/// first position and the forms of its last box.
pub fn parse_conjugation_page(html: &str) -> Option<ConjugationForms> {
    let document = Html::parse_document(html);
    let page_text: String = document.root_element().text().collect();
    if html.contains(VERB_NOT_FOUND) || page_text.contains(VERB_NOT_FOUND) {
        return None;
    }

    let selector = Selector::parse(CONTENT_BOX).ok()?;
    let mut result: ConjugationForms = Vec::new();
    for content in document.select(&selector) {
        let (name, forms) = parse_verb_form(&content);
        match result.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = forms,
            None => result.push((name, forms)),
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <div class="box_conj">
            <b>Infinitiv</b><br>
            <div class="cont_conj">a merge</div>
        </div>
        <div class="box_conj">
            <b>Viitor</b>
            <div class="cont_conj"><span>eu</span> voi merge</div>
            <div class="cont_conj">tu vei merge</div>
            <div class="cont_conj"> - </div>
            <div class="other">noise</div>
            <p class="cont_conj">not a div</p>
        </div>
        <div class="box_conj_header">ignored</div>
    </body></html>"#;

    #[test]
    fn test_parse_page() {
        let forms = parse_conjugation_page(PAGE).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0], ("Infinitiv".to_string(), vec!["a merge".to_string()]));
        assert_eq!(forms[1].0, "Viitor");
        assert_eq!(forms[1].1, vec!["eu voi merge", "tu vei merge"]);
    }

    #[test]
    fn test_not_found_page() {
        let html = "<html><body><p>Verbul nu a fost g&#259;sit.</p></body></html>";
        assert!(parse_conjugation_page(html).is_none());
    }

    #[test]
    fn test_page_without_boxes() {
        assert_eq!(parse_conjugation_page("<html></html>").unwrap(), Vec::new());
    }

    #[test]
    fn test_repeated_form_name() {
        let html = r#"<div class="box_conj"><b>Viitor</b><div class="cont_conj">eu voi fi</div></div>
            <div class="box_conj"><b>Prezent</b><div class="cont_conj">eu sunt</div></div>
            <div class="box_conj"><b>Viitor</b><div class="cont_conj">eu voi fi</div><div class="cont_conj">tu vei fi</div></div>"#;
        let forms = parse_conjugation_page(html).unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].0, "Viitor");
        assert_eq!(forms[0].1.len(), 2);
    }

    #[test]
    fn test_class_match_is_case_insensitive() {
        let html = r#"<div class="box_conj"><b>Viitor</b><DIV class="Cont_Conj x">eu voi fi</DIV></div>"#;
        let forms = parse_conjugation_page(html).unwrap();
        assert_eq!(forms[0].1, vec!["eu voi fi"]);
    }
}
