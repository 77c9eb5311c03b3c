//! Position-tagged text fragments.
//!
//! A [`Fragment`] is either literal text or an ordered list of child
//! fragments. Any fragment may carry a [`Tag`] naming the source position it
//! was generated from. Rendering a composite is the in-order concatenation of
//! its children, so composition is associative:
//!
//! ```text
//! concat([concat([a, b]), c])  ==  concat([a, concat([b, c])])  ==  concat([a, b, c])
//! ```
//!
//! A composite's tag marks where its own text begins and is recorded before
//! any of its children's tags. Composing never touches the children's tags.

use quill_common::{FileId, SourcePosition};
use std::borrow::Cow;

/// Provenance of a fragment: where in which source file it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    pub position: SourcePosition,
    pub file: FileId,
}

impl Tag {
    pub const fn new(position: SourcePosition, file: FileId) -> Self {
        Self { position, file }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Text(Cow<'static, str>),
    Children(Vec<Fragment>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    tag: Option<Tag>,
    content: Content,
}

impl Fragment {
    /// Literal text with no provenance.
    pub fn leaf(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: None,
            content: Content::Text(text.into()),
        }
    }

    /// An untagged composite with no children.
    pub fn empty() -> Self {
        Self {
            tag: None,
            content: Content::Children(Vec::new()),
        }
    }

    /// Literal text tagged with its source position.
    pub fn tagged(tag: Tag, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: Some(tag),
            content: Content::Text(text.into()),
        }
    }

    /// A tagged composite of `children`.
    pub fn tagged_composite(tag: Tag, children: Vec<Fragment>) -> Self {
        Self {
            tag: Some(tag),
            content: Content::Children(children),
        }
    }

    /// An untagged composite of `fragments`, in order.
    pub fn concat(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        Self {
            tag: None,
            content: Content::Children(fragments.into_iter().collect()),
        }
    }

    /// Append a child.
    ///
    /// A leaf becomes a composite whose first child is its old text; the tag
    /// stays on the outer fragment, so the rendered text and mappings of the
    /// existing content do not change.
    pub fn push(&mut self, child: Fragment) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Text(text) => {
                let text = std::mem::take(text);
                self.content = Content::Children(vec![Fragment::leaf(text), child]);
            }
        }
    }

    /// Builder form of [`Fragment::push`].
    pub fn with(mut self, child: Fragment) -> Self {
        self.push(child);
        self
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The text of a leaf, `None` for composites.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    /// The children of a composite, empty for leaves.
    pub fn children(&self) -> &[Fragment] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Children(children) => children,
        }
    }

    /// Number of tagged fragments in this tree, including `self`.
    pub fn tag_count(&self) -> usize {
        usize::from(self.tag.is_some())
            + self.children().iter().map(Fragment::tag_count).sum::<usize>()
    }
}

#[cfg(test)]
#[path = "../tests/fragment.rs"]
mod tests;
