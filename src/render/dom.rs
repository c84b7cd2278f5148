//! DOM synchronization (wasm only)
//!
//! Live planks map to absolutely positioned divs keyed by stable item id, so
//! mid-list removals never shift which element a body paints to. Towers are
//! rebuilt wholesale, but only when their revision changes. All DOM calls
//! are best-effort; a failed style write degrades visually, never errors.

use std::collections::{HashMap, HashSet};

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use super::frame::{tower_sprites, Sprite};
use crate::sim::Towers;

pub struct DomSync {
    document: Document,
    live_layer: HtmlElement,
    tower_layer: HtmlElement,
    count_label: Option<HtmlElement>,
    empty_label: Option<HtmlElement>,
    els: HashMap<u32, HtmlElement>,
    tower_revision: Option<u64>,
}

impl DomSync {
    /// Build the two render layers inside the host container. Towers sit in
    /// the back layer, live planks in the front.
    pub fn new(document: Document, container: &HtmlElement) -> Result<Self, JsValue> {
        let tower_layer = new_layer(&document, "0")?;
        let live_layer = new_layer(&document, "5")?;
        container.append_child(&tower_layer)?;
        container.append_child(&live_layer)?;

        let count_label = find(&document, "pile-count");
        let empty_label = find(&document, "pile-empty");

        Ok(Self {
            document,
            live_layer,
            tower_layer,
            count_label,
            empty_label,
            els: HashMap::new(),
            tower_revision: None,
        })
    }

    /// Copy live sprite poses into their elements, creating and retiring
    /// elements as the live set changes.
    pub fn sync_live(&mut self, sprites: &[Sprite]) {
        let mut seen: HashSet<u32> = HashSet::with_capacity(sprites.len());
        for sprite in sprites {
            let Some(id) = sprite.id else { continue };
            seen.insert(id);

            if !self.els.contains_key(&id) {
                if let Some(el) = new_plank(&self.document, sprite) {
                    let _ = self.live_layer.append_child(&el);
                    self.els.insert(id, el);
                }
            }
            if let Some(el) = self.els.get(&id) {
                let style = el.style();
                let _ = style.set_property("left", &format!("{}px", sprite.pos.x));
                let _ = style.set_property("top", &format!("{}px", sprite.pos.y));
                let _ = style.set_property(
                    "transform",
                    &format!("translate(-50%, -50%) rotate({}rad)", sprite.rotation),
                );
            }
        }

        // Elements whose item left the live set (retired or drained).
        self.els.retain(|id, el| {
            if seen.contains(id) {
                true
            } else {
                el.remove();
                false
            }
        });
    }

    /// Rebuild the tower layer when the stacks changed since last frame.
    pub fn sync_towers(&mut self, towers: &Towers, stage_center: f32, floor_y: f32) {
        if self.tower_revision == Some(towers.revision) {
            return;
        }
        self.tower_revision = Some(towers.revision);

        self.tower_layer.set_inner_html("");
        for sprite in tower_sprites(towers, stage_center, floor_y) {
            if let Some(el) = new_plank(&self.document, &sprite) {
                let style = el.style();
                let _ = style.set_property("left", &format!("{}px", sprite.pos.x));
                let _ = style.set_property("top", &format!("{}px", sprite.pos.y));
                let _ = style.set_property("transform", "translate(-50%, -50%)");
                let _ = self.tower_layer.append_child(&el);
            }
        }
    }

    /// Unread count label and empty-state message.
    pub fn update_hud(&self, target: u32) {
        if let Some(label) = &self.count_label {
            label.set_text_content(Some(&format!("{target} unread")));
        }
        if let Some(empty) = &self.empty_label {
            let display = if target == 0 { "flex" } else { "none" };
            let _ = empty.style().set_property("display", display);
        }
    }

    /// Remove every element this sync created. Idempotent.
    pub fn detach(&mut self) {
        for (_, el) in self.els.drain() {
            el.remove();
        }
        self.live_layer.remove();
        self.tower_layer.remove();
    }
}

fn new_layer(document: &Document, z_index: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    let style = el.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("inset", "0");
    let _ = style.set_property("pointer-events", "none");
    let _ = style.set_property("z-index", z_index);
    Ok(el)
}

/// A plank div with its fixed visual style; pose is written per frame.
fn new_plank(document: &Document, sprite: &Sprite) -> Option<HtmlElement> {
    let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    let style = el.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("width", &format!("{}px", sprite.width));
    let _ = style.set_property("height", &format!("{}px", sprite.height));
    let _ = style.set_property("background-color", sprite.fill);
    let _ = style.set_property("border", &format!("2px solid {}", sprite.border));
    let _ = style.set_property("border-radius", "4px");
    let _ = style.set_property("box-shadow", "0 16px 30px -12px rgba(0,0,0,0.18)");

    // Spine strip along the left edge of the book.
    if let Some(spine) = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let spine_style = spine.style();
        let _ = spine_style.set_property("height", "100%");
        let _ = spine_style.set_property("width", "8px");
        let _ = spine_style.set_property("background-color", "rgba(156,163,175,0.7)");
        let _ = el.append_child(&spine);
    }
    Some(el)
}

fn find(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}
