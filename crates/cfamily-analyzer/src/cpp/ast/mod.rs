//! C++ declaration AST.
//!
//! One sum type per grammar category; every node is immutable, structurally
//! comparable/hashable, serde-serializable, and stringifies (`Display`) to
//! canonical source-like text that re-parses to an equal node.

pub mod decl;
pub mod expr;
pub mod name;
pub mod template;
pub mod ty;

pub use decl::{
    BaseClass, Class, Concept, Declaration, DeclarationBody, Enum, EnumKey, Enumerator,
    ObjectType, Union, Visibility,
};
pub use expr::{
    BracedInitList, CallArgs, CastKind, CharLiteral, Expr, ParenExprList, PostfixBase, PostfixOp,
    TypeOrExpr,
};
pub use name::{ANON_SENTINEL, IdentOrOp, Identifier, NestedName, NestedNameElement, Operator};
pub use template::{
    ConstrainedTypeWithInit, RequiresClause, TemplateArg, TemplateArgs, TemplateDeclarationPrefix,
    TemplateIntroduction, TemplateIntroductionParameter, TemplateKey,
    TemplateKeyParamPackIdDefault, TemplateParam, TemplateParams, TemplatePrefixItem,
};
pub use ty::{
    ArrayOp, DeclSpecs, DeclSpecsSimple, Declarator, ExplicitSpec, FunctionParameter,
    FunctionSpecifier, Initializer, NoexceptSpec, ParametersQualifiers, RefQualifier,
    StorageClass, TrailingTypeSpec, Type, TypePrefix, TypeUsing, TypeWithInit,
};
