//! Browser Platform Implementation
//!
//! DOM-backed implementations of the shell's host-facing traits:
//! - `DomInput`: an `<input>` element as the editable surface
//! - `DomOutput`: an element that receives one `<div>` per output line
//!
//! The DOM counts selection offsets in UTF-16 code units; the shell counts
//! characters. Conversion happens here and nowhere else.

use crate::shell::{Direction, EditableSurface, OutputSink, Selection, ShellError, ShellResult, Stream};
use wasm_bindgen::JsCast;

/// Browser text input as an editable surface
pub struct DomInput {
    element: web_sys::HtmlInputElement,
}

impl DomInput {
    pub fn new(element: web_sys::HtmlInputElement) -> Self {
        Self { element }
    }

    /// Find `<input id=...>` in the current document
    pub fn by_id(id: &str) -> ShellResult<Self> {
        let element = element_by_id(id)?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| ShellError::Dom {
                reason: format!("#{} is not an <input>", id),
            })?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &web_sys::HtmlInputElement {
        &self.element
    }
}

impl EditableSurface for DomInput {
    fn value(&self) -> String {
        self.element.value()
    }

    fn set_value(&mut self, value: &str) {
        self.element.set_value(value);
    }

    fn selection(&self) -> Selection {
        let value = self.element.value();
        let start = self.element.selection_start().ok().flatten().unwrap_or(0);
        let end = self.element.selection_end().ok().flatten().unwrap_or(start);
        let direction = self
            .element
            .selection_direction()
            .ok()
            .flatten()
            .map(|d| Direction::parse(&d))
            .unwrap_or_default();
        Selection {
            start: utf16_to_char(&value, start),
            end: utf16_to_char(&value, end),
            direction,
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        let value = self.element.value();
        let start = char_to_utf16(&value, selection.start);
        let end = char_to_utf16(&value, selection.end);
        let _ = self
            .element
            .set_selection_range_with_direction(start, end, selection.direction.as_str());
    }
}

/// Output element receiving one `<div class="stdout|stderr">` per line
pub struct DomOutput {
    document: web_sys::Document,
    container: web_sys::Element,
}

impl DomOutput {
    pub fn by_id(id: &str) -> ShellResult<Self> {
        let document = document()?;
        let container = element_by_id(id)?;
        Ok(Self { document, container })
    }
}

impl OutputSink for DomOutput {
    fn append(&mut self, stream: Stream, text: &str) {
        let line = match self.document.create_element("div") {
            Ok(el) => el,
            Err(_) => return,
        };
        line.set_class_name(stream.as_str());
        line.set_text_content(Some(text));
        let _ = self.container.append_child(&line);
        self.container.set_scroll_top(self.container.scroll_height());
    }

    fn clear(&mut self) {
        self.container.set_inner_html("");
    }
}

fn document() -> ShellResult<web_sys::Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ShellError::Dom {
            reason: "no document".to_string(),
        })
}

fn element_by_id(id: &str) -> ShellResult<web_sys::Element> {
    document()?.get_element_by_id(id).ok_or_else(|| ShellError::Dom {
        reason: format!("no element #{}", id),
    })
}

/// UTF-16 offset -> character offset
fn utf16_to_char(value: &str, offset: u32) -> usize {
    let mut units = 0u32;
    for (i, c) in value.chars().enumerate() {
        if units >= offset {
            return i;
        }
        units += c.len_utf16() as u32;
    }
    value.chars().count()
}

/// Character offset -> UTF-16 offset
fn char_to_utf16(value: &str, offset: usize) -> u32 {
    value
        .chars()
        .take(offset)
        .map(|c| c.len_utf16() as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_conversion() {
        let value = "$ 🦀x";
        assert_eq!(char_to_utf16(value, 3), 4);
        assert_eq!(utf16_to_char(value, 4), 3);
        assert_eq!(utf16_to_char(value, 99), 4);
    }
}
