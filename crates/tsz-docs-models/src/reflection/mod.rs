//! Reflection model.
//!
//! A [`Reflection`] describes one documented entity. Reflections form a tree
//! owned by `ProjectReflection`: parents hold their children by id in the
//! structural slots of their variant data, and each child records its parent
//! id. Structural slots are only mutated through the registry so the registry
//! indexes never go stale.

mod reference;

pub use reference::ReferenceTarget;

use crate::comment::{Comment, CommentDisplayPart};
use crate::groups::{ReflectionCategory, ReflectionGroup};
use crate::sources::SourceReference;
use crate::types::Type;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use tsz_docs_common::{ReflectionFlags, ReflectionId, ReflectionKind};

// =============================================================================
// Structural roles
// =============================================================================

/// Role a child reflection plays inside its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraverseProperty {
    Children,
    Documents,
    Parameters,
    TypeParameter,
    Signatures,
    IndexSignature,
    GetSignature,
    SetSignature,
    /// Declaration owned through a [`Type::Reflection`] in the parent's type.
    TypeLiteral,
}

/// Serialized `variant` discriminator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariantTag {
    Project,
    Declaration,
    Signature,
    Param,
    TypeParam,
    Reference,
    Document,
}

impl VariantTag {
    pub const ALL: [Self; 7] = [
        Self::Project,
        Self::Declaration,
        Self::Signature,
        Self::Param,
        Self::TypeParam,
        Self::Reference,
        Self::Document,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Declaration => "declaration",
            Self::Signature => "signature",
            Self::Param => "param",
            Self::TypeParam => "typeParam",
            Self::Reference => "reference",
            Self::Document => "document",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == tag)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarianceModifier {
    In,
    Out,
    InOut,
}

impl VarianceModifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "in out",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "in out" => Some(Self::InOut),
            _ => None,
        }
    }
}

// =============================================================================
// Variant data
// =============================================================================

/// Children, documents and their presentation groupings.
#[derive(Clone, Debug, Default)]
pub struct ContainerData {
    pub(crate) children: Vec<ReflectionId>,
    pub(crate) documents: Vec<ReflectionId>,
    pub groups: Option<Vec<ReflectionGroup>>,
    pub categories: Option<Vec<ReflectionCategory>>,
}

impl ContainerData {
    pub fn children(&self) -> &[ReflectionId] {
        &self.children
    }

    pub fn documents(&self) -> &[ReflectionId] {
        &self.documents
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProjectData {
    pub(crate) container: ContainerData,
    pub package_name: Option<String>,
    pub package_version: Option<String>,
    pub readme: Option<Vec<CommentDisplayPart>>,
}

#[derive(Clone, Debug, Default)]
pub struct DeclarationData {
    pub(crate) container: ContainerData,
    pub sources: Vec<SourceReference>,
    pub(crate) type_: Option<Type>,
    pub(crate) type_parameters: Vec<ReflectionId>,
    pub(crate) signatures: Vec<ReflectionId>,
    pub(crate) index_signatures: Vec<ReflectionId>,
    pub(crate) get_signature: Option<ReflectionId>,
    pub(crate) set_signature: Option<ReflectionId>,
    pub default_value: Option<String>,
    pub overwrites: Option<Type>,
    pub inherited_from: Option<Type>,
    pub implementation_of: Option<Type>,
    pub extended_types: Vec<Type>,
    pub extended_by: Vec<Type>,
    pub implemented_types: Vec<Type>,
    pub implemented_by: Vec<Type>,
    pub package_version: Option<String>,
    pub readme: Option<Vec<CommentDisplayPart>>,
}

impl DeclarationData {
    pub fn type_parameters(&self) -> &[ReflectionId] {
        &self.type_parameters
    }

    pub fn signatures(&self) -> &[ReflectionId] {
        &self.signatures
    }

    pub fn index_signatures(&self) -> &[ReflectionId] {
        &self.index_signatures
    }

    pub fn get_signature(&self) -> Option<ReflectionId> {
        self.get_signature
    }

    pub fn set_signature(&self) -> Option<ReflectionId> {
        self.set_signature
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignatureData {
    pub sources: Vec<SourceReference>,
    pub(crate) parameters: Vec<ReflectionId>,
    pub(crate) type_parameters: Vec<ReflectionId>,
    pub(crate) type_: Option<Type>,
    pub overwrites: Option<Type>,
    pub inherited_from: Option<Type>,
    pub implementation_of: Option<Type>,
}

impl SignatureData {
    pub fn parameters(&self) -> &[ReflectionId] {
        &self.parameters
    }

    pub fn type_parameters(&self) -> &[ReflectionId] {
        &self.type_parameters
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub(crate) type_: Option<Type>,
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TypeParameterData {
    /// Constraint (`T extends X`).
    pub(crate) type_: Option<Type>,
    pub default: Option<Type>,
    pub variance_modifier: Option<VarianceModifier>,
}

#[derive(Clone, Debug)]
pub struct ReferenceData {
    pub(crate) target: ReferenceTarget,
}

impl ReferenceData {
    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocumentData {
    pub content: Vec<CommentDisplayPart>,
    pub frontmatter: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub enum ReflectionVariant {
    Project(ProjectData),
    Declaration(DeclarationData),
    Signature(SignatureData),
    Param(ParameterData),
    TypeParam(TypeParameterData),
    Reference(ReferenceData),
    Document(DocumentData),
}

impl ReflectionVariant {
    pub const fn tag(&self) -> VariantTag {
        match self {
            Self::Project(_) => VariantTag::Project,
            Self::Declaration(_) => VariantTag::Declaration,
            Self::Signature(_) => VariantTag::Signature,
            Self::Param(_) => VariantTag::Param,
            Self::TypeParam(_) => VariantTag::TypeParam,
            Self::Reference(_) => VariantTag::Reference,
            Self::Document(_) => VariantTag::Document,
        }
    }
}

// =============================================================================
// Reflection
// =============================================================================

#[derive(Clone, Debug)]
pub struct Reflection {
    id: ReflectionId,
    pub name: String,
    pub kind: ReflectionKind,
    pub flags: ReflectionFlags,
    pub comment: Option<Comment>,
    parent: Option<ReflectionId>,
    /// Rendered on its own page; scopes alias de-duplication.
    pub has_own_document: bool,
    /// Free-form data owned by extension components.
    pub plugin_data: BTreeMap<String, Value>,
    alias: OnceCell<String>,
    alias_counters: RefCell<FxHashMap<String, u32>>,
    variant: ReflectionVariant,
}

/// Id carried by a reflection that has not entered a registry yet.
const UNREGISTERED: ReflectionId = ReflectionId(u32::MAX);

impl Reflection {
    fn new(name: impl Into<String>, kind: ReflectionKind, variant: ReflectionVariant) -> Self {
        Self {
            id: UNREGISTERED,
            name: name.into(),
            kind,
            flags: ReflectionFlags::empty(),
            comment: None,
            parent: None,
            has_own_document: false,
            plugin_data: BTreeMap::new(),
            alias: OnceCell::new(),
            alias_counters: RefCell::new(FxHashMap::default()),
            variant,
        }
    }

    pub(crate) fn project(name: impl Into<String>) -> Self {
        let mut project = Self::new(
            name,
            ReflectionKind::PROJECT,
            ReflectionVariant::Project(ProjectData::default()),
        );
        project.id = ReflectionId::PROJECT;
        project.has_own_document = true;
        project
    }

    pub fn declaration(name: impl Into<String>, kind: ReflectionKind) -> Self {
        Self::new(name, kind, ReflectionVariant::Declaration(DeclarationData::default()))
    }

    pub fn signature(name: impl Into<String>, kind: ReflectionKind) -> Self {
        Self::new(name, kind, ReflectionVariant::Signature(SignatureData::default()))
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ReflectionKind::PARAMETER,
            ReflectionVariant::Param(ParameterData::default()),
        )
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ReflectionKind::TYPE_PARAMETER,
            ReflectionVariant::TypeParam(TypeParameterData::default()),
        )
    }

    pub fn reference(name: impl Into<String>, target: ReferenceTarget) -> Self {
        Self::new(
            name,
            ReflectionKind::REFERENCE,
            ReflectionVariant::Reference(ReferenceData { target }),
        )
    }

    pub fn document(name: impl Into<String>, content: Vec<CommentDisplayPart>) -> Self {
        Self::new(
            name,
            ReflectionKind::DOCUMENT,
            ReflectionVariant::Document(DocumentData {
                content,
                frontmatter: Map::new(),
            }),
        )
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ReflectionFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Set the type before the reflection is registered.
    ///
    /// A [`Type::Reflection`] must not be used here; type-literal declarations
    /// need a parent id and are attached with `ProjectReflection::set_type`.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        debug_assert!(ty.reflection_declarations().is_empty());
        if let Some(slot) = self.type_slot_mut() {
            *slot = Some(ty);
        }
        self
    }

    pub fn id(&self) -> ReflectionId {
        self.id
    }

    pub fn parent(&self) -> Option<ReflectionId> {
        self.parent
    }

    pub fn variant(&self) -> &ReflectionVariant {
        &self.variant
    }

    pub fn variant_tag(&self) -> VariantTag {
        self.variant.tag()
    }

    pub fn kind_of(&self, kind: ReflectionKind) -> bool {
        self.kind.kind_of(kind)
    }

    pub fn is_project(&self) -> bool {
        matches!(self.variant, ReflectionVariant::Project(_))
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.variant, ReflectionVariant::Declaration(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.variant, ReflectionVariant::Reference(_))
    }

    pub fn as_project(&self) -> Option<&ProjectData> {
        match &self.variant {
            ReflectionVariant::Project(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_project_mut(&mut self) -> Option<&mut ProjectData> {
        match &mut self.variant {
            ReflectionVariant::Project(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&DeclarationData> {
        match &self.variant {
            ReflectionVariant::Declaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_declaration_mut(&mut self) -> Option<&mut DeclarationData> {
        match &mut self.variant {
            ReflectionVariant::Declaration(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_signature(&self) -> Option<&SignatureData> {
        match &self.variant {
            ReflectionVariant::Signature(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_signature_mut(&mut self) -> Option<&mut SignatureData> {
        match &mut self.variant {
            ReflectionVariant::Signature(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterData> {
        match &self.variant {
            ReflectionVariant::Param(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterData> {
        match &mut self.variant {
            ReflectionVariant::Param(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterData> {
        match &self.variant {
            ReflectionVariant::TypeParam(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_type_parameter_mut(&mut self) -> Option<&mut TypeParameterData> {
        match &mut self.variant {
            ReflectionVariant::TypeParam(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceData> {
        match &self.variant {
            ReflectionVariant::Reference(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentData> {
        match &self.variant {
            ReflectionVariant::Document(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut DocumentData> {
        match &mut self.variant {
            ReflectionVariant::Document(data) => Some(data),
            _ => None,
        }
    }

    /// Container data of a project or declaration.
    pub fn container(&self) -> Option<&ContainerData> {
        match &self.variant {
            ReflectionVariant::Project(data) => Some(&data.container),
            ReflectionVariant::Declaration(data) => Some(&data.container),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut ContainerData> {
        match &mut self.variant {
            ReflectionVariant::Project(data) => Some(&mut data.container),
            ReflectionVariant::Declaration(data) => Some(&mut data.container),
            _ => None,
        }
    }

    /// `type` of a declaration, signature or parameter; constraint of a type
    /// parameter.
    pub fn type_(&self) -> Option<&Type> {
        match &self.variant {
            ReflectionVariant::Declaration(data) => data.type_.as_ref(),
            ReflectionVariant::Signature(data) => data.type_.as_ref(),
            ReflectionVariant::Param(data) => data.type_.as_ref(),
            ReflectionVariant::TypeParam(data) => data.type_.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn type_slot_mut(&mut self) -> Option<&mut Option<Type>> {
        match &mut self.variant {
            ReflectionVariant::Declaration(data) => Some(&mut data.type_),
            ReflectionVariant::Signature(data) => Some(&mut data.type_),
            ReflectionVariant::Param(data) => Some(&mut data.type_),
            ReflectionVariant::TypeParam(data) => Some(&mut data.type_),
            _ => None,
        }
    }

    pub fn sources(&self) -> &[SourceReference] {
        match &self.variant {
            ReflectionVariant::Declaration(data) => &data.sources,
            ReflectionVariant::Signature(data) => &data.sources,
            _ => &[],
        }
    }

    /// Every type stored on this reflection, structural or not.
    pub fn types(&self) -> Vec<&Type> {
        let mut out: Vec<&Type> = self.type_().into_iter().collect();
        match &self.variant {
            ReflectionVariant::Declaration(d) => {
                out.extend(d.overwrites.iter());
                out.extend(d.inherited_from.iter());
                out.extend(d.implementation_of.iter());
                out.extend(d.extended_types.iter());
                out.extend(d.extended_by.iter());
                out.extend(d.implemented_types.iter());
                out.extend(d.implemented_by.iter());
            }
            ReflectionVariant::Signature(s) => {
                out.extend(s.overwrites.iter());
                out.extend(s.inherited_from.iter());
                out.extend(s.implementation_of.iter());
            }
            ReflectionVariant::TypeParam(t) => out.extend(t.default.iter()),
            _ => {}
        }
        out
    }

    pub fn types_mut(&mut self) -> Vec<&mut Type> {
        match &mut self.variant {
            ReflectionVariant::Declaration(d) => d
                .type_
                .iter_mut()
                .chain(d.overwrites.iter_mut())
                .chain(d.inherited_from.iter_mut())
                .chain(d.implementation_of.iter_mut())
                .chain(d.extended_types.iter_mut())
                .chain(d.extended_by.iter_mut())
                .chain(d.implemented_types.iter_mut())
                .chain(d.implemented_by.iter_mut())
                .collect(),
            ReflectionVariant::Signature(s) => s
                .type_
                .iter_mut()
                .chain(s.overwrites.iter_mut())
                .chain(s.inherited_from.iter_mut())
                .chain(s.implementation_of.iter_mut())
                .collect(),
            ReflectionVariant::Param(p) => p.type_.iter_mut().collect(),
            ReflectionVariant::TypeParam(t) => t.type_.iter_mut().chain(t.default.iter_mut()).collect(),
            _ => Vec::new(),
        }
    }

    /// Display-part lists owned by this reflection: comment parts, readme and
    /// document content.
    pub fn display_parts_mut(&mut self) -> Vec<&mut CommentDisplayPart> {
        let mut out: Vec<&mut CommentDisplayPart> = Vec::new();
        if let Some(comment) = &mut self.comment {
            out.extend(comment.display_parts_mut());
        }
        match &mut self.variant {
            ReflectionVariant::Project(p) => out.extend(p.readme.iter_mut().flatten()),
            ReflectionVariant::Declaration(d) => out.extend(d.readme.iter_mut().flatten()),
            ReflectionVariant::Document(d) => out.extend(d.content.iter_mut()),
            _ => {}
        }
        out
    }

    pub(crate) fn alias_cell(&self) -> &OnceCell<String> {
        &self.alias
    }

    pub(crate) fn alias_counters(&self) -> &RefCell<FxHashMap<String, u32>> {
        &self.alias_counters
    }

    pub(crate) fn set_registered(&mut self, id: ReflectionId, parent: Option<ReflectionId>) {
        self.id = id;
        self.parent = parent;
    }

    pub(crate) fn set_parent(&mut self, parent: ReflectionId) {
        self.parent = Some(parent);
    }

    pub(crate) fn reference_target_mut(&mut self) -> Option<&mut ReferenceTarget> {
        match &mut self.variant {
            ReflectionVariant::Reference(data) => Some(&mut data.target),
            _ => None,
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Visit structural children in field order, tagged with their role.
    ///
    /// Returning [`ControlFlow::Break`] from `callback` stops the traversal.
    pub fn traverse(
        &self,
        mut callback: impl FnMut(ReflectionId, TraverseProperty) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        use TraverseProperty as P;

        fn each(
            ids: &[ReflectionId],
            role: TraverseProperty,
            callback: &mut impl FnMut(ReflectionId, TraverseProperty) -> ControlFlow<()>,
        ) -> ControlFlow<()> {
            for &id in ids {
                callback(id, role)?;
            }
            ControlFlow::Continue(())
        }

        // Type literals can sit in any stored type, not just the main one.
        let literals: Vec<ReflectionId> = self
            .types()
            .into_iter()
            .flat_map(Type::reflection_declarations)
            .collect();

        match &self.variant {
            ReflectionVariant::Project(p) => {
                each(&p.container.children, P::Children, &mut callback)?;
                each(&p.container.documents, P::Documents, &mut callback)
            }
            ReflectionVariant::Declaration(d) => {
                each(&d.type_parameters, P::TypeParameter, &mut callback)?;
                each(&literals, P::TypeLiteral, &mut callback)?;
                each(&d.signatures, P::Signatures, &mut callback)?;
                each(&d.index_signatures, P::IndexSignature, &mut callback)?;
                if let Some(get) = d.get_signature {
                    callback(get, P::GetSignature)?;
                }
                if let Some(set) = d.set_signature {
                    callback(set, P::SetSignature)?;
                }
                each(&d.container.children, P::Children, &mut callback)?;
                each(&d.container.documents, P::Documents, &mut callback)
            }
            ReflectionVariant::Signature(s) => {
                each(&literals, P::TypeLiteral, &mut callback)?;
                each(&s.type_parameters, P::TypeParameter, &mut callback)?;
                each(&s.parameters, P::Parameters, &mut callback)
            }
            ReflectionVariant::Param(_) => each(&literals, P::TypeLiteral, &mut callback),
            ReflectionVariant::TypeParam(_) => each(&literals, P::TypeLiteral, &mut callback),
            ReflectionVariant::Reference(_) | ReflectionVariant::Document(_) => ControlFlow::Continue(()),
        }
    }

    /// Structural children as `(id, role)` pairs.
    pub fn structural_children(&self) -> Vec<(ReflectionId, TraverseProperty)> {
        let mut out = Vec::new();
        let _ = self.traverse(|id, role| {
            out.push((id, role));
            ControlFlow::Continue(())
        });
        out
    }

    /// Link `child` into the slot for `role`.
    ///
    /// Type literals are registered without touching the parent; the caller
    /// places the [`Type::Reflection`] node itself.
    ///
    /// # Panics
    ///
    /// When this variant has no slot for `role`.
    pub(crate) fn attach(&mut self, child: ReflectionId, role: TraverseProperty) {
        use TraverseProperty as P;
        use ReflectionVariant as V;

        let tag = self.variant.tag();
        let attached = match (&mut self.variant, role) {
            (V::Project(p), P::Children) => {
                p.container.children.push(child);
                true
            }
            (V::Project(p), P::Documents) => {
                p.container.documents.push(child);
                true
            }
            (V::Declaration(d), P::Children) => {
                d.container.children.push(child);
                true
            }
            (V::Declaration(d), P::Documents) => {
                d.container.documents.push(child);
                true
            }
            (V::Declaration(d), P::TypeParameter) => {
                d.type_parameters.push(child);
                true
            }
            (V::Declaration(d), P::Signatures) => {
                d.signatures.push(child);
                true
            }
            (V::Declaration(d), P::IndexSignature) => {
                d.index_signatures.push(child);
                true
            }
            (V::Declaration(d), P::GetSignature) => {
                d.get_signature = Some(child);
                true
            }
            (V::Declaration(d), P::SetSignature) => {
                d.set_signature = Some(child);
                true
            }
            (V::Signature(s), P::Parameters) => {
                s.parameters.push(child);
                true
            }
            (V::Signature(s), P::TypeParameter) => {
                s.type_parameters.push(child);
                true
            }
            (V::Declaration(_) | V::Signature(_) | V::Param(_) | V::TypeParam(_), P::TypeLiteral) => true,
            _ => false,
        };
        assert!(
            attached,
            "{} reflection {} has no {role:?} slot",
            tag.as_str(),
            self.id
        );
    }

    /// Unlink `child` from the slot for `role`.
    ///
    /// For a type literal, every stored type that mentions `child` is
    /// replaced as a whole with the intrinsic `Object`.
    pub(crate) fn detach(&mut self, child: ReflectionId, role: TraverseProperty) {
        use TraverseProperty as P;
        use ReflectionVariant as V;

        if role == P::TypeLiteral {
            for ty in self.types_mut() {
                if ty.reflection_declarations().contains(&child) {
                    *ty = Type::intrinsic("Object");
                }
            }
        }

        match (&mut self.variant, role) {
            (V::Project(p), P::Children) => p.container.children.retain(|&c| c != child),
            (V::Project(p), P::Documents) => p.container.documents.retain(|&c| c != child),
            (V::Declaration(d), P::Children) => d.container.children.retain(|&c| c != child),
            (V::Declaration(d), P::Documents) => d.container.documents.retain(|&c| c != child),
            (V::Declaration(d), P::TypeParameter) => d.type_parameters.retain(|&c| c != child),
            (V::Declaration(d), P::Signatures) => d.signatures.retain(|&c| c != child),
            (V::Declaration(d), P::IndexSignature) => d.index_signatures.retain(|&c| c != child),
            (V::Declaration(d), P::GetSignature) => {
                if d.get_signature == Some(child) {
                    d.get_signature = None;
                }
            }
            (V::Declaration(d), P::SetSignature) => {
                if d.set_signature == Some(child) {
                    d.set_signature = None;
                }
            }
            (V::Signature(s), P::Parameters) => s.parameters.retain(|&c| c != child),
            (V::Signature(s), P::TypeParameter) => s.type_parameters.retain(|&c| c != child),
            _ => {}
        }
        if let Some(container) = self.container_mut() {
            if let Some(groups) = &mut container.groups {
                groups.retain_mut(|g| !g.remove_child(child));
                if groups.is_empty() {
                    container.groups = None;
                }
            }
            if let Some(categories) = &mut container.categories {
                crate::groups::remove_from_categories(categories, child);
                if categories.is_empty() {
                    container.categories = None;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/reflection_tests.rs"]
mod tests;
