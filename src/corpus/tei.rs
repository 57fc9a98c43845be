//! TEI session documents
//!
//! Each ParlaMint session file is a `TEI` document. The session date sits in
//! `teiHeader/.../settingDesc/setting/date/@when` and every speech is a
//! `u` element whose `who` attribute identifies the speaker.

use crate::error::{IoResultExt, ParlaMintError, Result};
use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The TEI namespace
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// Which text nodes make up the text of an utterance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Text opening each element only. Text following the end tag of a
    /// nested element is dropped, as are whitespace-only nodes.
    #[default]
    Inner,
    /// Every descendant text node, including text after nested elements
    Full,
}

/// A single speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    /// Value of `@who`, usually `#FirstnameLastname`
    pub speaker: Option<String>,
    /// Text of the utterance and its descendants
    pub text: String,
}

impl Utterance {
    /// Speaker id, empty when the utterance is unattributed
    pub fn speaker_id(&self) -> &str {
        self.speaker.as_deref().unwrap_or("")
    }
}

/// A parsed plenary session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// File the session was read from
    pub path: PathBuf,
    /// Date of the sitting
    pub date: NaiveDate,
    /// Speeches in document order
    pub utterances: Vec<Utterance>,
}

impl Session {
    /// Parse a session file
    pub fn parse(path: &Path) -> Result<Self> {
        Self::parse_with_mode(path, TextMode::default())
    }

    /// Parse a session file, collecting utterance text as `mode` says
    pub fn parse_with_mode(path: &Path, mode: TextMode) -> Result<Self> {
        let xml = std::fs::read_to_string(path).with_path(path)?;
        Self::from_xml_with_mode(&xml, path, mode)
    }

    /// Parse a session document held in memory
    pub fn from_xml(xml: &str, path: &Path) -> Result<Self> {
        Self::from_xml_with_mode(xml, path, TextMode::default())
    }

    /// Parse a session document held in memory with the given text mode
    pub fn from_xml_with_mode(xml: &str, path: &Path, mode: TextMode) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut open: Vec<String> = Vec::new();
        let mut date_attr: Option<Option<String>> = None;
        let mut utterances = Vec::new();
        // utterance being read and the element depth it was opened at
        let mut current: Option<(Utterance, usize)> = None;
        // set once a nested element closed: following text is its tail
        let mut in_tail = false;

        loop {
            let event = reader
                .read_resolved_event()
                .map_err(|e| ParlaMintError::xml(path, e.to_string()))?;

            match event {
                (ns, Event::Start(e)) => {
                    in_tail = false;
                    let name = local_name(&e);
                    if date_attr.is_none() && is_session_date(&name, open.last()) {
                        date_attr = Some(attribute(&e, "when", path)?);
                    }
                    if current.is_none() && is_utterance(&ns, &name) {
                        let speaker = attribute(&e, "who", path)?;
                        current = Some((
                            Utterance {
                                speaker,
                                text: String::new(),
                            },
                            open.len(),
                        ));
                    }
                    open.push(name);
                }
                (ns, Event::Empty(e)) => {
                    in_tail = true;
                    let name = local_name(&e);
                    if date_attr.is_none() && is_session_date(&name, open.last()) {
                        date_attr = Some(attribute(&e, "when", path)?);
                    }
                    if current.is_none() && is_utterance(&ns, &name) {
                        utterances.push(Utterance {
                            speaker: attribute(&e, "who", path)?,
                            text: String::new(),
                        });
                    }
                }
                (_, Event::End(_)) => {
                    in_tail = true;
                    open.pop();
                    if let Some((utterance, depth)) = current.take() {
                        if open.len() == depth {
                            utterances.push(utterance);
                        } else {
                            current = Some((utterance, depth));
                        }
                    }
                }
                (_, Event::Text(t)) => {
                    if let Some((utterance, _)) = current.as_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| ParlaMintError::xml(path, e.to_string()))?;
                        push_text(&mut utterance.text, &text, mode, in_tail);
                    }
                }
                (_, Event::CData(c)) => {
                    if let Some((utterance, _)) = current.as_mut() {
                        push_text(&mut utterance.text, &String::from_utf8_lossy(&c), mode, in_tail);
                    }
                }
                (_, Event::Comment(_)) | (_, Event::PI(_)) => in_tail = true,
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        let when = date_attr
            .flatten()
            .ok_or_else(|| ParlaMintError::MissingSessionDate(path.to_path_buf()))?;
        let date = NaiveDate::parse_from_str(when.trim(), "%Y-%m-%d").map_err(|_| {
            ParlaMintError::InvalidDate {
                path: path.to_path_buf(),
                value: when.clone(),
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            date,
            utterances,
        })
    }

    /// Distinct speaker ids in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for u in &self.utterances {
            if !speakers.contains(&u.speaker_id()) {
                speakers.push(u.speaker_id());
            }
        }
        speakers
    }
}

fn push_text(target: &mut String, text: &str, mode: TextMode, in_tail: bool) {
    match mode {
        TextMode::Full => target.push_str(text),
        TextMode::Inner if in_tail || text.trim().is_empty() => {}
        TextMode::Inner => target.push_str(text),
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn is_session_date(name: &str, parent: Option<&String>) -> bool {
    name.contains("date") && parent.is_some_and(|p| p.contains("setting"))
}

fn is_utterance(ns: &ResolveResult<'_>, name: &str) -> bool {
    name == "u" && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == TEI_NAMESPACE.as_bytes())
}

fn attribute(e: &BytesStart<'_>, key: &str, path: &Path) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| ParlaMintError::xml(path, err.to_string()))?;
    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|err| ParlaMintError::xml(path, err.to_string()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xml:lang="ro">
  <teiHeader>
    <profileDesc>
      <settingDesc>
        <setting>
          <name type="city">București</name>
          <date when="2019-03-12">12.03.2019</date>
        </setting>
      </settingDesc>
    </profileDesc>
  </teiHeader>
  <text>
    <body>
      <div type="debateSection">
        <note type="speaker">Domnul Ion Popescu:</note>
        <u who="#PopescuIon" xml:id="u1">
          <seg>Vom vota mâine.</seg>
          <seg>Noi vom discuta &amp; vom decide.</seg>
        </u>
        <u who="#IonescuMaria" xml:id="u2"><seg>Voi merge <![CDATA[acasă]]>.</seg></u>
        <u xml:id="u3"/>
      </div>
    </body>
  </text>
</TEI>
"##;

    #[test]
    fn test_parse_session() {
        let session = Session::from_xml(SESSION, Path::new("s.xml")).unwrap();
        assert_eq!(session.date, NaiveDate::from_ymd_opt(2019, 3, 12).unwrap());
        assert_eq!(session.utterances.len(), 3);

        let first = &session.utterances[0];
        assert_eq!(first.speaker_id(), "#PopescuIon");
        assert_eq!(first.text, "Vom vota mâine.Noi vom discuta & vom decide.");

        assert_eq!(session.utterances[1].text, "Voi merge acasă.");
        assert_eq!(session.utterances[2].speaker, None);
        assert_eq!(session.speakers(), vec!["#PopescuIon", "#IonescuMaria", ""]);
    }

    const NESTED: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
        <settingDesc><setting><date when="2019-03-12"/></setting></settingDesc>
        <u who="#A"><seg>Noi <note>(aplauze)</note> vom vota.</seg></u>
        <u who="#B"><seg>Vom <!-- sic --> pleca<lb/> acum.</seg></u>
    </TEI>"##;

    #[test]
    fn test_inner_text_drops_text_after_nested_elements() {
        let session = Session::from_xml(NESTED, Path::new("s.xml")).unwrap();
        assert_eq!(session.utterances[0].text, "Noi (aplauze)");
        assert_eq!(session.utterances[1].text, "Vom ");
    }

    #[test]
    fn test_full_text_keeps_text_after_nested_elements() {
        let session =
            Session::from_xml_with_mode(NESTED, Path::new("s.xml"), TextMode::Full).unwrap();
        assert_eq!(session.utterances[0].text, "Noi (aplauze) vom vota.");
        assert_eq!(session.utterances[1].text, "Vom  pleca acum.");
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ParlaMint-RO_2019-03-12.xml");
        std::fs::write(&path, SESSION).unwrap();
        let session = Session::parse_with_mode(&path, TextMode::Full).unwrap();
        assert_eq!(session.path, path);
        assert!(session.utterances[0].text.contains("mâine.\n"));

        let err = Session::parse(&dir.path().join("missing.xml")).unwrap_err();
        assert!(matches!(err, ParlaMintError::Io { .. }));
    }

    #[test]
    fn test_u_outside_tei_namespace_is_ignored() {
        let xml = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0" xmlns:x="urn:other">
            <settingDesc><setting><date when="2001-01-01"/></setting></settingDesc>
            <x:u who="#A">voi fi</x:u>
            <u who="#B">voi fi</u>
        </TEI>"##;
        let session = Session::from_xml(xml, Path::new("s.xml")).unwrap();
        assert_eq!(session.utterances.len(), 1);
        assert_eq!(session.utterances[0].speaker_id(), "#B");
    }

    #[test]
    fn test_first_setting_date_wins() {
        let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
            <publicationStmt><date when="2021-05-05"/></publicationStmt>
            <settingDesc><setting><date when="2004-10-01"/><date when="2004-10-02"/></setting></settingDesc>
        </TEI>"#;
        let session = Session::from_xml(xml, Path::new("s.xml")).unwrap();
        assert_eq!(session.date, NaiveDate::from_ymd_opt(2004, 10, 1).unwrap());
        assert!(session.utterances.is_empty());
    }

    #[test]
    fn test_missing_date() {
        let xml = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0"><u who="#A">x</u></TEI>"##;
        let err = Session::from_xml(xml, Path::new("s.xml")).unwrap_err();
        assert!(matches!(err, ParlaMintError::MissingSessionDate(_)));
    }

    #[test]
    fn test_invalid_date() {
        let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
            <setting><date when="12.03.2019"/></setting></TEI>"#;
        let err = Session::from_xml(xml, Path::new("s.xml")).unwrap_err();
        assert!(matches!(err, ParlaMintError::InvalidDate { .. }));
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<TEI><setting><date when="2019-01-01"></setting></TEI>"#;
        let err = Session::from_xml(xml, Path::new("bad.xml")).unwrap_err();
        assert!(matches!(err, ParlaMintError::Xml { .. }));
        assert!(err.is_recoverable());
    }
}
