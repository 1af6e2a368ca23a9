use quick_xml::events::Event;
use quick_xml::Reader;

use super::EntryDraft;
use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Href,
    ContentLength,
    LastModified,
}

#[derive(Default)]
struct MultistatusState {
    saw_multistatus: bool,
    current: Option<EntryDraft>,
    in_resource_type: bool,
    field: Option<Field>,
    drafts: Vec<EntryDraft>,
}

impl MultistatusState {
    fn open(&mut self, name: &str, is_empty: bool) {
        match name {
            "multistatus" => self.saw_multistatus = true,
            "response" if !is_empty => self.current = Some(EntryDraft::default()),
            "resourcetype" => {
                if let Some(draft) = self.current.as_mut() {
                    draft.resource_type.get_or_insert(false);
                }
                self.in_resource_type = !is_empty;
            }
            "collection" if self.in_resource_type => {
                if let Some(draft) = self.current.as_mut() {
                    draft.resource_type = Some(true);
                }
            }
            "href" if !is_empty => self.field = Some(Field::Href),
            "getcontentlength" if !is_empty => self.field = Some(Field::ContentLength),
            "getlastmodified" if !is_empty => self.field = Some(Field::LastModified),
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "response" => {
                if let Some(draft) = self.current.take() {
                    self.drafts.push(draft);
                }
            }
            "resourcetype" => self.in_resource_type = false,
            "href" | "getcontentlength" | "getlastmodified" => self.field = None,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let (Some(field), Some(draft)) = (self.field, self.current.as_mut()) else {
            return;
        };
        let slot = match field {
            // Only the first href of a response names the resource.
            Field::Href if !draft.href.is_empty() => return,
            Field::Href => {
                draft.href.push_str(text);
                return;
            }
            Field::ContentLength => &mut draft.content_length,
            Field::LastModified => &mut draft.last_modified,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

/// Structured parse of a `multistatus` document into one draft per `response`.
///
/// Namespace prefixes are ignored. Mismatched or unclosed elements, or a document
/// without a `multistatus` element, fail the whole parse.
pub(crate) fn parse_multistatus(body: &str) -> Result<Vec<EntryDraft>, ParseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut state = MultistatusState::default();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                state.open(&local_name(e.local_name().as_ref()), false);
            }
            Ok(Event::Empty(e)) => {
                state.open(&local_name(e.local_name().as_ref()), true);
            }
            Ok(Event::End(e)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::MalformedXml("unbalanced end tag".into()))?;
                state.close(&local_name(e.local_name().as_ref()));
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ParseError::MalformedXml(err.to_string()))?;
                state.text(&text);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                state.text(&String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ParseError::MalformedXml(err.to_string())),
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::MalformedXml(format!(
            "document ended with {depth} unclosed elements"
        )));
    }
    if !state.saw_multistatus {
        return Err(ParseError::NotMultistatus);
    }
    Ok(state.drafts)
}
