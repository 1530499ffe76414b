//! Table of contents markers.
//!
//! ```html
//! <toc-group id="toc">
//!   <toc-item title="Intro" anchor="intro"></toc-item>
//! </toc-group>
//! ```
//!
//! Both rules render their inner HTML into a partial and raise dirty, since
//! the output may still contain nested markers.

use kuchikiki::NodeRef;
use serde_json::Value;

use super::Context;
use crate::dom::NodeExt;
use crate::error::{Error, Result};
use crate::partial::{Partials, TemplateData};

const GROUP_TEMPLATE: &str = "toc-group.html";
const ITEM_TEMPLATE: &str = "toc-item.html";

/// `<toc-group>`
pub async fn group<P: Partials>(marker: &NodeRef, cx: &Context<'_, P>) -> Result<Option<String>> {
    let template = marker
        .non_empty_attr("template")
        .unwrap_or_else(|| GROUP_TEMPLATE.to_string());

    let mut data = common_data(marker);
    data.insert(
        "suppress_contents".into(),
        Value::Bool(marker.attr("suppress-contents").is_some()),
    );

    let html = cx.render(&template, &data).await?;
    cx.dirty.raise();
    Ok(Some(html))
}

/// `<toc-item title anchor>`
pub async fn item<P: Partials>(marker: &NodeRef, cx: &Context<'_, P>) -> Result<Option<String>> {
    let title = required(marker, "title")?;
    let anchor = required(marker, "anchor")?;
    let template = marker
        .non_empty_attr("template")
        .unwrap_or_else(|| ITEM_TEMPLATE.to_string());

    let mut data = common_data(marker);
    data.insert(
        "text_classes".into(),
        Value::from(marker.attr("text-classes").unwrap_or_default()),
    );
    data.insert("title".into(), Value::from(title));
    data.insert("anchor".into(), Value::from(anchor));

    let html = cx.render(&template, &data).await?;
    cx.dirty.raise();
    Ok(Some(html))
}

fn required(marker: &NodeRef, attribute: &'static str) -> Result<String> {
    marker
        .non_empty_attr(attribute)
        .ok_or(Error::MissingAttribute {
            tag: "toc-item",
            attribute,
        })
}

/// `id`, `additional_classes` and `content`, shared by both markers.
fn common_data(marker: &NodeRef) -> TemplateData {
    let mut data = TemplateData::new();
    if let Some(id) = marker.non_empty_attr("id") {
        data.insert("id".into(), Value::from(id));
    }
    data.insert(
        "additional_classes".into(),
        Value::from(marker.attr("additional-classes").unwrap_or_default()),
    );
    data.insert("content".into(), Value::from(marker.inner_html()));
    data
}
