//! Attribute and content helpers on tree nodes.

use kuchikiki::NodeRef;

use crate::utils::html;

/// Element helpers implemented on [`NodeRef`].
///
/// All methods are no-ops (or return `None`) on non-element nodes.
pub trait NodeExt {
    /// Local tag name, lowercase.
    fn tag_name(&self) -> Option<String>;

    /// Attribute value as written (may be empty).
    fn attr(&self, name: &str) -> Option<String>;

    /// Attribute value, treating empty or whitespace-only values as absent.
    fn non_empty_attr(&self, name: &str) -> Option<String>;

    /// Set (or overwrite) an attribute.
    fn set_attr(&self, name: &str, value: &str);

    /// Check whether the `class` attribute lists `name`.
    fn has_class(&self, name: &str) -> bool;

    /// Serialise the children of this node (the node's own tags excluded).
    fn inner_html(&self) -> String;
}

impl NodeExt for NodeRef {
    fn tag_name(&self) -> Option<String> {
        self.as_element().map(|e| e.name.local.to_string())
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(str::to_string))
    }

    fn non_empty_attr(&self, name: &str) -> Option<String> {
        self.attr(name).filter(|v| !v.trim().is_empty())
    }

    fn set_attr(&self, name: &str, value: &str) {
        if let Some(element) = self.as_element() {
            element
                .attributes
                .borrow_mut()
                .insert(name, value.to_string());
        }
    }

    fn has_class(&self, name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| html::has_class(&classes, name))
    }

    fn inner_html(&self) -> String {
        self.children().map(|child| child.to_string()).collect()
    }
}
