//! Comments and display parts.

use super::DeserializeContext;
use crate::error::DeserializeIssue;
use crate::json::{self, JsonObject};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tsz_docs_models::comment::{InlineTagDisplayPart, InlineTagTarget, RelativeLinkDisplayPart};
use tsz_docs_models::{Comment, CommentDisplayPart, CommentTag, ReflectionId};

pub(super) fn comment(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) -> Comment {
    let mut comment = Comment::new(display_parts(obj.get("summary"), ctx));
    comment.block_tags = json::objects(obj, "blockTags")
        .map(|tag| CommentTag {
            tag: json::string_field(tag, "tag").unwrap_or_default(),
            name: json::string_field(tag, "name"),
            content: display_parts(tag.get("content"), ctx),
        })
        .collect();
    comment.modifier_tags = obj
        .get("modifierTags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    comment.label = json::string_field(obj, "label");
    comment
}

/// Parts of the display-part array `value`. Parts of an unknown kind are
/// skipped.
pub(super) fn display_parts(value: Option<&Value>, ctx: &mut DeserializeContext<'_>) -> Vec<CommentDisplayPart> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .filter_map(|part| display_part(part, ctx))
        .collect()
}

fn display_part(obj: &JsonObject, ctx: &mut DeserializeContext<'_>) -> Option<CommentDisplayPart> {
    let text = json::string_field(obj, "text").unwrap_or_default();
    let part = match json::str_field(obj, "kind")? {
        "text" => CommentDisplayPart::Text(text),
        "code" => CommentDisplayPart::Code(text),
        "inline-tag" => {
            let target = match obj.get("target") {
                Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).map(|old| {
                    ctx.pending_targets += 1;
                    InlineTagTarget::Pending(old)
                }),
                Some(Value::Object(symbol)) => ctx.symbol_id(symbol).map(InlineTagTarget::Symbol),
                Some(Value::String(url)) => Some(InlineTagTarget::Url(url.clone())),
                _ => None,
            };
            CommentDisplayPart::InlineTag(InlineTagDisplayPart {
                tag: json::string_field(obj, "tag").unwrap_or_default(),
                text,
                target,
                ts_link_text: json::string_field(obj, "tsLinkText"),
            })
        }
        "relative-link" => {
            let target = json::u32_field(obj, "target").and_then(|old| {
                let file = ctx.file_id(old);
                if file.is_none() {
                    ctx.report(DeserializeIssue::MissingFile { old_id: old });
                }
                file
            });
            CommentDisplayPart::RelativeLink(RelativeLinkDisplayPart {
                text,
                target,
                target_anchor: json::string_field(obj, "targetAnchor"),
            })
        }
        _ => return None,
    };
    Some(part)
}

/// Point inline tags that still carry a serialized id at the revived
/// reflection. Returns the serialized ids that had no counterpart; those
/// tags lose their target.
pub(super) fn resolve_pending_parts<'a>(
    parts: impl IntoIterator<Item = &'a mut CommentDisplayPart>,
    ids: &FxHashMap<u32, ReflectionId>,
) -> Vec<u32> {
    let mut missing = Vec::new();
    for part in parts {
        if let CommentDisplayPart::InlineTag(tag) = part
            && let Some(InlineTagTarget::Pending(old)) = tag.target
        {
            tag.target = ids.get(&old).copied().map(InlineTagTarget::Reflection);
            if tag.target.is_none() {
                missing.push(old);
            }
        }
    }
    missing
}
