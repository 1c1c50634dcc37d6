//! Hover tooltip
//!
//! `Tooltip` is the pure presenter: hover result + pointer in, visible state
//! out. On the web, `dom::DomTooltip` mirrors that state onto a `div`.

use glam::Vec2;

use crate::picking::HoverResult;

/// What the tooltip should look like right now
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipState {
    pub visible: bool,
    /// Last shown name (kept while hidden, like a DOM node would)
    pub text: String,
    /// Left edge in CSS pixels
    pub left: f32,
    /// Top edge in CSS pixels
    pub top: f32,
}

/// Tooltip presenter
#[derive(Debug, Clone)]
pub struct Tooltip {
    offset: f32,
    state: TooltipState,
}

impl Tooltip {
    pub fn new(offset: f32) -> Self {
        Self {
            offset,
            state: TooltipState::default(),
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Show the hovered shape's name next to the pointer, or hide.
    ///
    /// Returns whether the visible state changed.
    pub fn present(&mut self, hover: &HoverResult, pointer: Vec2) -> bool {
        let next = match hover {
            Some(hit) => TooltipState {
                visible: true,
                text: hit.name.clone(),
                left: pointer.x + self.offset,
                top: pointer.y + self.offset,
            },
            None => TooltipState {
                visible: false,
                ..self.state.clone()
            },
        };

        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }
}

#[cfg(target_arch = "wasm32")]
pub mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    use super::TooltipState;
    use crate::error::SceneError;

    /// Absolutely positioned label appended to `<body>`
    pub struct DomTooltip {
        element: HtmlElement,
        /// Last state written to the element
        shown: TooltipState,
    }

    impl DomTooltip {
        pub fn new(document: &Document) -> Result<Self, SceneError> {
            let element: HtmlElement = document
                .create_element("div")
                .map_err(|_| SceneError::Dom("failed to create tooltip".into()))?
                .dyn_into()
                .map_err(|_| SceneError::Dom("tooltip is not an HtmlElement".into()))?;

            let style = element.style();
            for (key, value) in [
                ("position", "absolute"),
                ("background-color", "rgba(0, 0, 0, 0.7)"),
                ("color", "white"),
                ("padding", "5px"),
                ("display", "none"),
                ("border-radius", "5px"),
                ("pointer-events", "none"),
            ] {
                let _ = style.set_property(key, value);
            }

            let body = document
                .body()
                .ok_or_else(|| SceneError::Dom("no body".into()))?;
            body.append_child(&element)
                .map_err(|_| SceneError::Dom("failed to attach tooltip".into()))?;

            Ok(Self {
                element,
                shown: TooltipState::default(),
            })
        }

        /// Write the state to the element if it changed
        pub fn apply(&mut self, state: &TooltipState) {
            if *state == self.shown {
                return;
            }
            self.shown = state.clone();
            let style = self.element.style();
            if state.visible {
                self.element.set_text_content(Some(&state.text));
                let _ = style.set_property("left", &format!("{}px", state.left));
                let _ = style.set_property("top", &format!("{}px", state.top));
                let _ = style.set_property("display", "block");
            } else {
                let _ = style.set_property("display", "none");
            }
        }
    }
}
