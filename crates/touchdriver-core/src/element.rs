//! UI element snapshots.
//!
//! A [`UiElement`] is a node of an element-tree snapshot: an immutable
//! attribute map, the element's visible bounds as computed by the tree
//! provider, and its children. Elements are never mutated after they are
//! built; the effect of an interaction is observed by taking a new snapshot.
//!
//! Attribute storage and the child list are `Arc`-shared, so cloning an
//! element (e.g. to hand it to an action task) is cheap.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeValue};
use crate::geometry::Rect;

/// Display marker for an element that is not currently visible.
pub const ATTRIB_NOT_VISIBLE: &str = "NotVisible";
/// Display key for visible bounds that differ from the raw bounds.
pub const ATTRIB_VISIBLE_BOUNDS: &str = "VisibleBounds";

/// A node of a captured UI hierarchy.
///
/// In JSON, a snapshot without `visible_bounds` takes its visible bounds from
/// the `bounds` attribute, as the builder does. `"not_visible": true` marks an
/// element that is not in the live tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UiElementRepr", into = "UiElementRepr")]
pub struct UiElement {
    attributes: Arc<BTreeMap<Attribute, AttributeValue>>,

    /// Bounds of the on-screen portion of the element. `None` when the
    /// element is not reachable in the live tree.
    visible_bounds: Option<Rect>,

    children: Option<Arc<[UiElement]>>,
}

/// Wire form of [`UiElement`].
#[derive(Serialize, Deserialize)]
struct UiElementRepr {
    attributes: Arc<BTreeMap<Attribute, AttributeValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible_bounds: Option<Rect>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    not_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Arc<[UiElement]>>,
}

impl From<UiElementRepr> for UiElement {
    fn from(repr: UiElementRepr) -> Self {
        let visible_bounds = if repr.not_visible {
            None
        } else {
            repr.visible_bounds.or_else(|| {
                repr.attributes
                    .get(&Attribute::Bounds)
                    .and_then(AttributeValue::as_rect)
            })
        };
        UiElement {
            attributes: repr.attributes,
            visible_bounds,
            children: repr.children,
        }
    }
}

impl From<UiElement> for UiElementRepr {
    fn from(element: UiElement) -> Self {
        UiElementRepr {
            attributes: element.attributes,
            not_visible: element.visible_bounds.is_none(),
            visible_bounds: element.visible_bounds,
            children: element.children,
        }
    }
}

/// A filter over child elements.
///
/// Any `Fn(&UiElement) -> bool` closure is a predicate. [`Any`] is the
/// match-everything predicate that [`UiElement::children`] recognizes
/// without evaluating it per child.
pub trait Predicate: Send + Sync {
    fn apply(&self, element: &UiElement) -> bool;

    /// True if this predicate accepts every element.
    fn matches_any(&self) -> bool {
        false
    }
}

/// Predicate that matches every element.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Predicate for Any {
    fn apply(&self, _element: &UiElement) -> bool {
        true
    }

    fn matches_any(&self) -> bool {
        true
    }
}

impl<F> Predicate for F
where
    F: Fn(&UiElement) -> bool + Send + Sync,
{
    fn apply(&self, element: &UiElement) -> bool {
        self(element)
    }
}

impl UiElement {
    pub fn builder() -> UiElementBuilder {
        UiElementBuilder::default()
    }

    /// Returns the raw value stored for `attribute`.
    pub fn get(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.attributes.get(&attribute)
    }

    /// Returns the string value of `attribute`, or `None` if it is absent or
    /// holds a different type.
    pub fn get_str(&self, attribute: Attribute) -> Option<&str> {
        self.get(attribute).and_then(AttributeValue::as_str)
    }

    pub fn get_bool(&self, attribute: Attribute) -> Option<bool> {
        self.get(attribute).and_then(AttributeValue::as_bool)
    }

    pub fn get_int(&self, attribute: Attribute) -> Option<i32> {
        self.get(attribute).and_then(AttributeValue::as_int)
    }

    pub fn get_rect(&self, attribute: Attribute) -> Option<Rect> {
        self.get(attribute).and_then(AttributeValue::as_rect)
    }

    /// All present attributes, in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub fn text(&self) -> Option<&str> {
        self.get_str(Attribute::Text)
    }

    pub fn content_description(&self) -> Option<&str> {
        self.get_str(Attribute::ContentDesc)
    }

    pub fn class_name(&self) -> Option<&str> {
        self.get_str(Attribute::Class)
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.get_str(Attribute::ResourceId)
    }

    pub fn package_name(&self) -> Option<&str> {
        self.get_str(Attribute::Package)
    }

    // The tree provider populates every boolean flag; an absent flag reads
    // as false.

    pub fn is_checkable(&self) -> bool {
        self.flag(Attribute::Checkable)
    }

    pub fn is_checked(&self) -> bool {
        self.flag(Attribute::Checked)
    }

    pub fn is_clickable(&self) -> bool {
        self.flag(Attribute::Clickable)
    }

    pub fn is_enabled(&self) -> bool {
        self.flag(Attribute::Enabled)
    }

    pub fn is_focusable(&self) -> bool {
        self.flag(Attribute::Focusable)
    }

    pub fn is_focused(&self) -> bool {
        self.flag(Attribute::Focused)
    }

    pub fn is_scrollable(&self) -> bool {
        self.flag(Attribute::Scrollable)
    }

    pub fn is_long_clickable(&self) -> bool {
        self.flag(Attribute::LongClickable)
    }

    pub fn is_password(&self) -> bool {
        self.flag(Attribute::Password)
    }

    pub fn is_selected(&self) -> bool {
        self.flag(Attribute::Selected)
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.get_rect(Attribute::Bounds)
    }

    /// Start of the text selection, `0` when absent.
    pub fn selection_start(&self) -> i32 {
        self.get_int(Attribute::SelectionStart).unwrap_or(0)
    }

    /// End of the text selection, `0` when absent.
    pub fn selection_end(&self) -> i32 {
        self.get_int(Attribute::SelectionEnd).unwrap_or(0)
    }

    pub fn has_selection(&self) -> bool {
        let start = self.selection_start();
        start >= 0 && start != self.selection_end()
    }

    pub fn visible_bounds(&self) -> Option<Rect> {
        self.visible_bounds
    }

    /// True if the element is in the live tree and has a non-empty visible
    /// area.
    pub fn is_visible(&self) -> bool {
        self.visible_bounds.is_some_and(|r| !r.is_empty())
    }

    /// The unfiltered child list (empty when the provider supplied none).
    pub fn all_children(&self) -> &[UiElement] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns the children accepted by `predicate`, in source order.
    ///
    /// `None` or a match-any predicate borrows the child list as is;
    /// otherwise a new filtered list is built.
    pub fn children(&self, predicate: Option<&dyn Predicate>) -> Cow<'_, [UiElement]> {
        let children = self.all_children();
        match predicate {
            None => Cow::Borrowed(children),
            Some(p) if p.matches_any() => Cow::Borrowed(children),
            Some(p) => Cow::Owned(children.iter().filter(|c| p.apply(c)).cloned().collect()),
        }
    }

    fn flag(&self, attribute: Attribute) -> bool {
        self.get_bool(attribute).unwrap_or(false)
    }
}

impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.attributes.len() + 1);
        for (attr, value) in self.attributes.iter() {
            match value {
                AttributeValue::Bool(true) => parts.push(attr.name().to_string()),
                AttributeValue::Bool(false) => {}
                AttributeValue::Rect(r) => parts.push(format!("{}={}", attr, r.short_string())),
                AttributeValue::Str(s) => parts.push(format!("{}={}", attr, s)),
                AttributeValue::Int(i) => parts.push(format!("{}={}", attr, i)),
            }
        }
        match self.visible_bounds {
            Some(vb) if self.is_visible() => {
                if Some(vb) != self.bounds() {
                    parts.push(format!("{}={}", ATTRIB_VISIBLE_BOUNDS, vb.short_string()));
                }
            }
            _ => parts.push(ATTRIB_NOT_VISIBLE.to_string()),
        }
        write!(f, "UiElement{{{}}}", parts.join(", "))
    }
}

/// Builds a [`UiElement`] snapshot.
///
/// Unless set explicitly, the visible bounds default to the `bounds`
/// attribute.
#[derive(Debug, Default)]
pub struct UiElementBuilder {
    attributes: BTreeMap<Attribute, AttributeValue>,
    visible_bounds: Option<Option<Rect>>,
    children: Option<Vec<UiElement>>,
}

impl UiElementBuilder {
    pub fn attribute(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(attribute, value.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.attribute(Attribute::Text, text.into())
    }

    pub fn class_name(self, class: impl Into<String>) -> Self {
        self.attribute(Attribute::Class, class.into())
    }

    pub fn resource_id(self, id: impl Into<String>) -> Self {
        self.attribute(Attribute::ResourceId, id.into())
    }

    pub fn bounds(self, bounds: Rect) -> Self {
        self.attribute(Attribute::Bounds, bounds)
    }

    /// Sets the visible portion of the element when it is partially occluded.
    pub fn visible_bounds(mut self, bounds: Rect) -> Self {
        self.visible_bounds = Some(Some(bounds));
        self
    }

    /// Marks the element as not reachable in the live tree.
    pub fn not_visible(mut self) -> Self {
        self.visible_bounds = Some(None);
        self
    }

    pub fn child(mut self, child: UiElement) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = UiElement>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(children);
        self
    }

    pub fn build(self) -> UiElement {
        let visible_bounds = match self.visible_bounds {
            Some(explicit) => explicit,
            None => self.attributes.get(&Attribute::Bounds).and_then(AttributeValue::as_rect),
        };
        UiElement {
            attributes: Arc::new(self.attributes),
            visible_bounds,
            children: self.children.map(Arc::from),
        }
    }
}
