//! Element attribute keys and their typed values.
//!
//! The set of keys is closed: every attribute an element can carry is one of
//! the [`Attribute`] variants. Values are stored as an [`AttributeValue`]
//! tagged union so that typed reads are checked matches instead of casts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A queryable attribute of a UI element.
///
/// Serialized using the same lowercase names that appear in hierarchy dumps
/// (e.g. `resource-id`, `long-clickable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "content-desc")]
    ContentDesc,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "resource-id")]
    ResourceId,
    #[serde(rename = "package")]
    Package,
    #[serde(rename = "checkable")]
    Checkable,
    #[serde(rename = "checked")]
    Checked,
    #[serde(rename = "clickable")]
    Clickable,
    #[serde(rename = "enabled")]
    Enabled,
    #[serde(rename = "focusable")]
    Focusable,
    #[serde(rename = "focused")]
    Focused,
    #[serde(rename = "scrollable")]
    Scrollable,
    #[serde(rename = "long-clickable")]
    LongClickable,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "selected")]
    Selected,
    #[serde(rename = "bounds")]
    Bounds,
    #[serde(rename = "selection-start")]
    SelectionStart,
    #[serde(rename = "selection-end")]
    SelectionEnd,
}

impl Attribute {
    /// Every attribute key, in declaration order.
    pub const ALL: [Attribute; 18] = [
        Attribute::Text,
        Attribute::ContentDesc,
        Attribute::Class,
        Attribute::ResourceId,
        Attribute::Package,
        Attribute::Checkable,
        Attribute::Checked,
        Attribute::Clickable,
        Attribute::Enabled,
        Attribute::Focusable,
        Attribute::Focused,
        Attribute::Scrollable,
        Attribute::LongClickable,
        Attribute::Password,
        Attribute::Selected,
        Attribute::Bounds,
        Attribute::SelectionStart,
        Attribute::SelectionEnd,
    ];

    /// The stable display name of this attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Text => "text",
            Attribute::ContentDesc => "content-desc",
            Attribute::Class => "class",
            Attribute::ResourceId => "resource-id",
            Attribute::Package => "package",
            Attribute::Checkable => "checkable",
            Attribute::Checked => "checked",
            Attribute::Clickable => "clickable",
            Attribute::Enabled => "enabled",
            Attribute::Focusable => "focusable",
            Attribute::Focused => "focused",
            Attribute::Scrollable => "scrollable",
            Attribute::LongClickable => "long-clickable",
            Attribute::Password => "password",
            Attribute::Selected => "selected",
            Attribute::Bounds => "bounds",
            Attribute::SelectionStart => "selection-start",
            Attribute::SelectionEnd => "selection-end",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of an attribute captured at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Str(String),
    Rect(Rect),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            AttributeValue::Rect(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<Rect> for AttributeValue {
    fn from(value: Rect) -> Self {
        AttributeValue::Rect(value)
    }
}
