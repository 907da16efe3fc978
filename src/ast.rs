//! The closed ESTree node family (spec §3 "AST Node"). Implemented as a single tagged
//! union — `pub enum Node` — rather than an inheritance hierarchy, per spec §9 ("Closed node
//! variants"): visitor-style dispatch is left to a collaborator and is just a `match` on the
//! tag.
//!
//! Generalizes the teacher crate's single generic `ASTNode<TNode>` (`src/ast_node.rs`) —
//! `{ node: TNode, start, end, bound, children }` for an arbitrary caller-supplied payload —
//! into the closed, ESTree-shaped variant set this parser actually produces. The teacher's
//! `Debug`/`Display` impls, `find_tree`/`list_tree` walkers, and `ptree::TreeItem` pretty
//! printer are kept, generalized from walking a homogeneous generic tree to walking the
//! heterogeneous closed variant set via [`Node::children`].

use crate::position::{Loc, Range};
use serde::ser::SerializeStruct;
use serde::Serialize;
use std::fmt::{Debug, Formatter};

/// Shared positional header embedded (via `#[serde(flatten)]`) in every node payload.
/// Serializes as ESTree's `range`/`loc` pair.
#[derive(Debug, Clone, Copy)]
pub struct NodeBase {
    pub range: Range,
    pub loc: Loc,
}

impl NodeBase {
    pub fn new(range: Range, loc: Loc) -> Self {
        Self { range, loc }
    }
}

impl Serialize for NodeBase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("NodeBase", 2)?;
        s.serialize_field("range", &[self.range.start, self.range.end])?;
        s.serialize_field("loc", &self.loc)?;
        s.end()
    }
}

/// A bare positional leaf: `ThisExpression`, `Super`, `EmptyStatement`, `DebuggerStatement`.
#[derive(Debug, Clone, Serialize)]
pub struct Leaf {
    #[serde(flatten)]
    pub base: NodeBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTypeTag {
    Script,
    Module,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(flatten)]
    pub base: NodeBase,
    pub body: Vec<Node>,
    pub source_type: SourceTypeTag,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub base: NodeBase,
    pub name: Box<str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrivateIdentifier {
    #[serde(flatten)]
    pub base: NodeBase,
    pub name: Box<str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LiteralScalar {
    Bool(bool),
    Number(f64),
    Str(Box<str>),
}

#[derive(Debug, Clone, Serialize)]
pub struct RegexMeta {
    pub pattern: Box<str>,
    pub flags: Box<str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Literal {
    #[serde(flatten)]
    pub base: NodeBase,
    pub value: Option<LiteralScalar>,
    pub raw: Box<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigint: Option<Box<str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayExprPat {
    #[serde(flatten)]
    pub base: NodeBase,
    pub elements: Vec<Option<Node>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectExprPat {
    #[serde(flatten)]
    pub base: NodeBase,
    pub properties: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Property {
    #[serde(flatten)]
    pub base: NodeBase,
    pub key: Box<Node>,
    pub value: Box<Node>,
    pub kind: PropertyKind,
    pub computed: bool,
    pub method: bool,
    pub shorthand: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    #[serde(flatten)]
    pub base: NodeBase,
    pub id: Option<Box<Node>>,
    pub params: Vec<Node>,
    pub body: Box<Node>,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    /// `true` when an arrow function's body is a bare expression, not a `BlockStatement`.
    pub expression: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Class {
    #[serde(flatten)]
    pub base: NodeBase,
    pub id: Option<Box<Node>>,
    pub super_class: Option<Box<Node>>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassBody {
    #[serde(flatten)]
    pub base: NodeBase,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodDefinition {
    #[serde(flatten)]
    pub base: NodeBase,
    pub key: Box<Node>,
    pub value: Box<Node>,
    pub kind: MethodKind,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub base: NodeBase,
    pub key: Box<Node>,
    pub value: Option<Box<Node>>,
    pub computed: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateElementValue {
    pub raw: Box<str>,
    pub cooked: Option<Box<str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateElement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub tail: bool,
    pub value: TemplateElementValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateLiteral {
    #[serde(flatten)]
    pub base: NodeBase,
    pub quasis: Vec<Node>,
    pub expressions: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaggedTemplateExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub tag: Box<Node>,
    pub quasi: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnaryLike {
    #[serde(flatten)]
    pub base: NodeBase,
    pub operator: Box<str>,
    pub prefix: bool,
    pub argument: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryLike {
    #[serde(flatten)]
    pub base: NodeBase,
    pub operator: Box<str>,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionalExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub test: Box<Node>,
    pub consequent: Box<Node>,
    pub alternate: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub object: Box<Node>,
    pub property: Box<Node>,
    pub computed: bool,
    pub optional: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub expressions: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YieldExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub argument: Option<Box<Node>>,
    pub delegate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaProperty {
    #[serde(flatten)]
    pub base: NodeBase,
    pub meta: Box<Node>,
    pub property: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportExpression {
    #[serde(flatten)]
    pub base: NodeBase,
    pub source: Box<Node>,
    pub options: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentPattern {
    #[serde(flatten)]
    pub base: NodeBase,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentWrapper {
    #[serde(flatten)]
    pub base: NodeBase,
    pub argument: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpressionStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub expression: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub object: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub argument: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub label: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub label: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub test: Box<Node>,
    pub consequent: Box<Node>,
    pub alternate: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub discriminant: Box<Node>,
    pub cases: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchCase {
    #[serde(flatten)]
    pub base: NodeBase,
    pub test: Option<Box<Node>>,
    pub consequent: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TryStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub block: Box<Node>,
    pub handler: Option<Box<Node>>,
    pub finalizer: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatchClause {
    #[serde(flatten)]
    pub base: NodeBase,
    pub param: Option<Box<Node>>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub test: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub init: Option<Box<Node>>,
    pub test: Option<Box<Node>>,
    pub update: Option<Box<Node>>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForInOfStatement {
    #[serde(flatten)]
    pub base: NodeBase,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub body: Box<Node>,
    #[serde(rename = "await")]
    pub is_await: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableDeclarator {
    #[serde(flatten)]
    pub base: NodeBase,
    pub id: Box<Node>,
    pub init: Option<Box<Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableDeclaration {
    #[serde(flatten)]
    pub base: NodeBase,
    pub declarations: Vec<Node>,
    pub kind: Box<str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecifierWithLocal {
    #[serde(flatten)]
    pub base: NodeBase,
    pub local: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSpecifier {
    #[serde(flatten)]
    pub base: NodeBase,
    pub imported: Box<Node>,
    pub local: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportAttribute {
    #[serde(flatten)]
    pub base: NodeBase,
    pub key: Box<Node>,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportDeclaration {
    #[serde(flatten)]
    pub base: NodeBase,
    pub specifiers: Vec<Node>,
    pub source: Box<Node>,
    pub attributes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportNamedDeclaration {
    #[serde(flatten)]
    pub base: NodeBase,
    pub declaration: Option<Box<Node>>,
    pub specifiers: Vec<Node>,
    pub source: Option<Box<Node>>,
    pub attributes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDefaultDeclaration {
    #[serde(flatten)]
    pub base: NodeBase,
    pub declaration: Box<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportAllDeclaration {
    #[serde(flatten)]
    pub base: NodeBase,
    pub source: Box<Node>,
    pub exported: Option<Box<Node>>,
    pub attributes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSpecifier {
    #[serde(flatten)]
    pub base: NodeBase,
    pub local: Box<Node>,
    pub exported: Box<Node>,
}

/// The closed ESTree node family. Every variant's payload embeds a [`NodeBase`] (flattened
/// into `range`/`loc` on serialization) plus its ESTree-specific fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Program(Program),
    Identifier(Identifier),
    PrivateIdentifier(PrivateIdentifier),
    Literal(Literal),
    ThisExpression(Leaf),
    Super(Leaf),
    ArrayExpression(ArrayExprPat),
    ObjectExpression(ObjectExprPat),
    Property(Property),
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    FunctionDeclaration(Function),
    ClassExpression(Class),
    ClassDeclaration(Class),
    ClassBody(ClassBody),
    MethodDefinition(MethodDefinition),
    PropertyDefinition(PropertyDefinition),
    StaticBlock(BlockStatement),
    TemplateElement(TemplateElement),
    TemplateLiteral(TemplateLiteral),
    TaggedTemplateExpression(TaggedTemplateExpression),
    UnaryExpression(UnaryLike),
    UpdateExpression(UnaryLike),
    BinaryExpression(BinaryLike),
    LogicalExpression(BinaryLike),
    AssignmentExpression(BinaryLike),
    ConditionalExpression(ConditionalExpression),
    CallExpression(CallExpression),
    NewExpression(NewExpression),
    MemberExpression(MemberExpression),
    ChainExpression(ChainExpression),
    SequenceExpression(SequenceExpression),
    SpreadElement(ArgumentWrapper),
    RestElement(ArgumentWrapper),
    YieldExpression(YieldExpression),
    AwaitExpression(ArgumentWrapper),
    MetaProperty(MetaProperty),
    ImportExpression(ImportExpression),
    ArrayPattern(ArrayExprPat),
    ObjectPattern(ObjectExprPat),
    AssignmentPattern(AssignmentPattern),
    ParenthesizedExpression(ArgumentWrapper),
    ExpressionStatement(ExpressionStatement),
    BlockStatement(BlockStatement),
    EmptyStatement(Leaf),
    DebuggerStatement(Leaf),
    WithStatement(WithStatement),
    ReturnStatement(ArgumentStatement),
    LabeledStatement(LabeledStatement),
    BreakStatement(LabelStatement),
    ContinueStatement(LabelStatement),
    IfStatement(IfStatement),
    SwitchStatement(SwitchStatement),
    SwitchCase(SwitchCase),
    ThrowStatement(ArgumentStatement),
    TryStatement(TryStatement),
    CatchClause(CatchClause),
    WhileStatement(WhileStatement),
    DoWhileStatement(WhileStatement),
    ForStatement(ForStatement),
    ForInStatement(ForInOfStatement),
    ForOfStatement(ForInOfStatement),
    VariableDeclaration(VariableDeclaration),
    VariableDeclarator(VariableDeclarator),
    ImportDeclaration(ImportDeclaration),
    ImportDefaultSpecifier(SpecifierWithLocal),
    ImportNamespaceSpecifier(SpecifierWithLocal),
    ImportSpecifier(ImportSpecifier),
    ImportAttribute(ImportAttribute),
    ExportNamedDeclaration(ExportNamedDeclaration),
    ExportDefaultDeclaration(ExportDefaultDeclaration),
    ExportAllDeclaration(ExportAllDeclaration),
    ExportSpecifier(ExportSpecifier),
}

impl Node {
    pub fn base(&self) -> &NodeBase {
        match self {
            Node::Program(n) => &n.base,
            Node::Identifier(n) => &n.base,
            Node::PrivateIdentifier(n) => &n.base,
            Node::Literal(n) => &n.base,
            Node::ThisExpression(n) => &n.base,
            Node::Super(n) => &n.base,
            Node::ArrayExpression(n) => &n.base,
            Node::ObjectExpression(n) => &n.base,
            Node::Property(n) => &n.base,
            Node::FunctionExpression(n) => &n.base,
            Node::ArrowFunctionExpression(n) => &n.base,
            Node::FunctionDeclaration(n) => &n.base,
            Node::ClassExpression(n) => &n.base,
            Node::ClassDeclaration(n) => &n.base,
            Node::ClassBody(n) => &n.base,
            Node::MethodDefinition(n) => &n.base,
            Node::PropertyDefinition(n) => &n.base,
            Node::StaticBlock(n) => &n.base,
            Node::TemplateElement(n) => &n.base,
            Node::TemplateLiteral(n) => &n.base,
            Node::TaggedTemplateExpression(n) => &n.base,
            Node::UnaryExpression(n) => &n.base,
            Node::UpdateExpression(n) => &n.base,
            Node::BinaryExpression(n) => &n.base,
            Node::LogicalExpression(n) => &n.base,
            Node::AssignmentExpression(n) => &n.base,
            Node::ConditionalExpression(n) => &n.base,
            Node::CallExpression(n) => &n.base,
            Node::NewExpression(n) => &n.base,
            Node::MemberExpression(n) => &n.base,
            Node::ChainExpression(n) => &n.base,
            Node::SequenceExpression(n) => &n.base,
            Node::SpreadElement(n) => &n.base,
            Node::RestElement(n) => &n.base,
            Node::YieldExpression(n) => &n.base,
            Node::AwaitExpression(n) => &n.base,
            Node::MetaProperty(n) => &n.base,
            Node::ImportExpression(n) => &n.base,
            Node::ArrayPattern(n) => &n.base,
            Node::ObjectPattern(n) => &n.base,
            Node::AssignmentPattern(n) => &n.base,
            Node::ParenthesizedExpression(n) => &n.base,
            Node::ExpressionStatement(n) => &n.base,
            Node::BlockStatement(n) => &n.base,
            Node::EmptyStatement(n) => &n.base,
            Node::DebuggerStatement(n) => &n.base,
            Node::WithStatement(n) => &n.base,
            Node::ReturnStatement(n) => &n.base,
            Node::LabeledStatement(n) => &n.base,
            Node::BreakStatement(n) => &n.base,
            Node::ContinueStatement(n) => &n.base,
            Node::IfStatement(n) => &n.base,
            Node::SwitchStatement(n) => &n.base,
            Node::SwitchCase(n) => &n.base,
            Node::ThrowStatement(n) => &n.base,
            Node::TryStatement(n) => &n.base,
            Node::CatchClause(n) => &n.base,
            Node::WhileStatement(n) => &n.base,
            Node::DoWhileStatement(n) => &n.base,
            Node::ForStatement(n) => &n.base,
            Node::ForInStatement(n) => &n.base,
            Node::ForOfStatement(n) => &n.base,
            Node::VariableDeclaration(n) => &n.base,
            Node::VariableDeclarator(n) => &n.base,
            Node::ImportDeclaration(n) => &n.base,
            Node::ImportDefaultSpecifier(n) => &n.base,
            Node::ImportNamespaceSpecifier(n) => &n.base,
            Node::ImportSpecifier(n) => &n.base,
            Node::ImportAttribute(n) => &n.base,
            Node::ExportNamedDeclaration(n) => &n.base,
            Node::ExportDefaultDeclaration(n) => &n.base,
            Node::ExportAllDeclaration(n) => &n.base,
            Node::ExportSpecifier(n) => &n.base,
        }
    }

    pub fn range(&self) -> Range {
        self.base().range
    }

    pub fn loc(&self) -> Loc {
        self.base().loc
    }

    /// The node's direct children in source order, for tree walking and the `ptree`
    /// pretty-printer — the generalization of the teacher's homogeneous `ASTNode::children`
    /// walk to the closed, heterogeneous variant set.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        macro_rules! push {
            ($opt:expr) => {
                if let Some(n) = $opt.as_deref() {
                    out.push(n);
                }
            };
        }
        macro_rules! push_all {
            ($vec:expr) => {
                out.extend($vec.iter());
            };
        }
        macro_rules! push_opts {
            ($vec:expr) => {
                out.extend($vec.iter().filter_map(|n| n.as_ref()));
            };
        }
        match self {
            Node::Program(n) => push_all!(n.body),
            Node::Identifier(_)
            | Node::PrivateIdentifier(_)
            | Node::Literal(_)
            | Node::ThisExpression(_)
            | Node::Super(_)
            | Node::EmptyStatement(_)
            | Node::DebuggerStatement(_)
            | Node::TemplateElement(_) => {}
            Node::ArrayExpression(n) | Node::ArrayPattern(n) => push_opts!(n.elements),
            Node::ObjectExpression(n) | Node::ObjectPattern(n) => push_all!(n.properties),
            Node::Property(n) => {
                out.push(&n.key);
                out.push(&n.value);
            }
            Node::FunctionExpression(n)
            | Node::ArrowFunctionExpression(n)
            | Node::FunctionDeclaration(n) => {
                push!(n.id);
                push_all!(n.params);
                out.push(&n.body);
            }
            Node::ClassExpression(n) | Node::ClassDeclaration(n) => {
                push!(n.id);
                push!(n.super_class);
                out.push(&n.body);
            }
            Node::ClassBody(n) | Node::StaticBlock(n) | Node::BlockStatement(n) => {
                push_all!(n.body)
            }
            Node::MethodDefinition(n) => {
                out.push(&n.key);
                out.push(&n.value);
            }
            Node::PropertyDefinition(n) => {
                out.push(&n.key);
                push!(n.value);
            }
            Node::TemplateLiteral(n) => {
                push_all!(n.quasis);
                push_all!(n.expressions);
            }
            Node::TaggedTemplateExpression(n) => {
                out.push(&n.tag);
                out.push(&n.quasi);
            }
            Node::UnaryExpression(n) | Node::UpdateExpression(n) => out.push(&n.argument),
            Node::BinaryExpression(n) | Node::LogicalExpression(n) | Node::AssignmentExpression(n) => {
                out.push(&n.left);
                out.push(&n.right);
            }
            Node::ConditionalExpression(n) => {
                out.push(&n.test);
                out.push(&n.consequent);
                out.push(&n.alternate);
            }
            Node::CallExpression(n) => {
                out.push(&n.callee);
                push_all!(n.arguments);
            }
            Node::NewExpression(n) => {
                out.push(&n.callee);
                push_all!(n.arguments);
            }
            Node::MemberExpression(n) => {
                out.push(&n.object);
                out.push(&n.property);
            }
            Node::ChainExpression(n) => out.push(&n.expression),
            Node::SequenceExpression(n) => push_all!(n.expressions),
            Node::SpreadElement(n) | Node::RestElement(n) | Node::AwaitExpression(n) => {
                out.push(&n.argument)
            }
            Node::YieldExpression(n) => push!(n.argument),
            Node::MetaProperty(n) => {
                out.push(&n.meta);
                out.push(&n.property);
            }
            Node::ImportExpression(n) => {
                out.push(&n.source);
                push!(n.options);
            }
            Node::AssignmentPattern(n) => {
                out.push(&n.left);
                out.push(&n.right);
            }
            Node::ParenthesizedExpression(n) => out.push(&n.argument),
            Node::ExpressionStatement(n) => out.push(&n.expression),
            Node::WithStatement(n) => {
                out.push(&n.object);
                out.push(&n.body);
            }
            Node::ReturnStatement(n) | Node::ThrowStatement(n) => push!(n.argument),
            Node::LabeledStatement(n) => {
                out.push(&n.label);
                out.push(&n.body);
            }
            Node::BreakStatement(n) | Node::ContinueStatement(n) => push!(n.label),
            Node::IfStatement(n) => {
                out.push(&n.test);
                out.push(&n.consequent);
                push!(n.alternate);
            }
            Node::SwitchStatement(n) => {
                out.push(&n.discriminant);
                push_all!(n.cases);
            }
            Node::SwitchCase(n) => {
                push!(n.test);
                push_all!(n.consequent);
            }
            Node::TryStatement(n) => {
                out.push(&n.block);
                push!(n.handler);
                push!(n.finalizer);
            }
            Node::CatchClause(n) => {
                push!(n.param);
                out.push(&n.body);
            }
            Node::WhileStatement(n) | Node::DoWhileStatement(n) => {
                out.push(&n.test);
                out.push(&n.body);
            }
            Node::ForStatement(n) => {
                push!(n.init);
                push!(n.test);
                push!(n.update);
                out.push(&n.body);
            }
            Node::ForInStatement(n) | Node::ForOfStatement(n) => {
                out.push(&n.left);
                out.push(&n.right);
                out.push(&n.body);
            }
            Node::VariableDeclaration(n) => push_all!(n.declarations),
            Node::VariableDeclarator(n) => {
                out.push(&n.id);
                push!(n.init);
            }
            Node::ImportDeclaration(n) => {
                push_all!(n.specifiers);
                out.push(&n.source);
                push_all!(n.attributes);
            }
            Node::ImportDefaultSpecifier(n) | Node::ImportNamespaceSpecifier(n) => {
                out.push(&n.local)
            }
            Node::ImportSpecifier(n) => {
                out.push(&n.imported);
                out.push(&n.local);
            }
            Node::ImportAttribute(n) => {
                out.push(&n.key);
                out.push(&n.value);
            }
            Node::ExportNamedDeclaration(n) => {
                push!(n.declaration);
                push_all!(n.specifiers);
                push!(n.source);
                push_all!(n.attributes);
            }
            Node::ExportDefaultDeclaration(n) => out.push(&n.declaration),
            Node::ExportAllDeclaration(n) => {
                out.push(&n.source);
                push!(n.exported);
                push_all!(n.attributes);
            }
            Node::ExportSpecifier(n) => {
                out.push(&n.local);
                out.push(&n.exported);
            }
        }
        out
    }

    /// Pretty-print the tree, matching the teacher crate's `ASTNode::print()` (`ptree`-backed
    /// debugging aid — not code generation, which remains out of scope).
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

impl ptree::TreeItem for Node {
    type Child = Node;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        let r = self.range();
        write!(f, "{} # {}-{}", self.variant_label(), r.start, r.end)
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(self.children().into_iter().cloned().collect::<Vec<_>>())
    }
}

impl Node {
    /// A short debug label for the variant, used by the `ptree` printer.
    fn variant_label(&self) -> &'static str {
        macro_rules! label {
            ($($variant:ident),* $(,)?) => {
                match self {
                    $(Node::$variant(_) => stringify!($variant),)*
                }
            };
        }
        label!(
            Program, Identifier, PrivateIdentifier, Literal, ThisExpression, Super,
            ArrayExpression, ObjectExpression, Property, FunctionExpression,
            ArrowFunctionExpression, FunctionDeclaration, ClassExpression, ClassDeclaration,
            ClassBody, MethodDefinition, PropertyDefinition, StaticBlock, TemplateElement,
            TemplateLiteral, TaggedTemplateExpression, UnaryExpression, UpdateExpression,
            BinaryExpression, LogicalExpression, AssignmentExpression, ConditionalExpression,
            CallExpression, NewExpression, MemberExpression, ChainExpression,
            SequenceExpression, SpreadElement, RestElement, YieldExpression, AwaitExpression,
            MetaProperty, ImportExpression, ArrayPattern, ObjectPattern, AssignmentPattern,
            ParenthesizedExpression, ExpressionStatement, BlockStatement, EmptyStatement,
            DebuggerStatement, WithStatement, ReturnStatement, LabeledStatement,
            BreakStatement, ContinueStatement, IfStatement, SwitchStatement, SwitchCase,
            ThrowStatement, TryStatement, CatchClause, WhileStatement, DoWhileStatement,
            ForStatement, ForInStatement, ForOfStatement, VariableDeclaration,
            VariableDeclarator, ImportDeclaration, ImportDefaultSpecifier,
            ImportNamespaceSpecifier, ImportSpecifier, ImportAttribute,
            ExportNamedDeclaration, ExportDefaultDeclaration, ExportAllDeclaration,
            ExportSpecifier,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Loc, Position, Range};

    fn base(start: usize, end: usize) -> NodeBase {
        NodeBase::new(
            Range::new(start, end),
            Loc::new(Position::new(1, start), Position::new(1, end)),
        )
    }

    #[test]
    fn identifier_serializes_to_estree_shape() {
        let node = Node::Identifier(Identifier {
            base: base(0, 1),
            name: "a".into(),
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "a");
        assert_eq!(json["range"], serde_json::json!([0, 1]));
    }

    #[test]
    fn children_walks_binary_expression() {
        let left = Node::Identifier(Identifier {
            base: base(0, 1),
            name: "a".into(),
        });
        let right = Node::Identifier(Identifier {
            base: base(4, 5),
            name: "b".into(),
        });
        let bin = Node::BinaryExpression(BinaryLike {
            base: base(0, 5),
            operator: "+".into(),
            left: Box::new(left),
            right: Box::new(right),
        });
        assert_eq!(bin.children().len(), 2);
    }
}
