//! Stable identifier generation for C++ symbols.
//!
//! Two schemes are kept so previously published links keep working:
//!
//! * **Version 1 (legacy)** — an approximation of the Itanium C++ ABI
//!   mangling, limited to forms expressible without template instantiation.
//!   Fails with [`IdError::NoLegacyId`] on constructs it cannot represent;
//!   callers fall back to the current scheme.
//! * **Version 2 (current)** — a hierarchical dotted path with an overload
//!   suffix; total over every representable declaration.
//!
//! Both are pure functions of the symbol's ancestor chain and declaration,
//! so identifiers are stable across incremental rebuilds.

use crate::cpp::ast::{
    Declarator, Expr, IdentOrOp, NestedName, ObjectType, Operator, ParametersQualifiers,
    RefQualifier, TemplateArg, TemplateArgs, TemplatePrefixItem, TrailingTypeSpec, Type,
};
use crate::cpp::symbols::{SymbolId, SymbolTree};
pub use crate::error::IdError;

pub const MAX_ID_VERSION: u8 = 2;

/// Compute the identifier of `symbol` under the given scheme version.
pub fn symbol_id(tree: &SymbolTree, symbol: SymbolId, version: u8) -> Result<String, IdError> {
    match version {
        1 => legacy_id(tree, symbol),
        2 => Ok(current_id(tree, symbol)),
        other => Err(IdError::UnknownVersion(other)),
    }
}

fn chain(tree: &SymbolTree, symbol: SymbolId) -> Vec<SymbolId> {
    let mut ids: Vec<SymbolId> = tree
        .ancestors(symbol)
        .into_iter()
        .filter(|&id| tree.get(id).ident_or_op().is_some())
        .collect();
    ids.reverse();
    ids
}

fn strip_ws(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---- current scheme (version 2) -------------------------------------------

fn current_id(tree: &SymbolTree, symbol: SymbolId) -> String {
    let mut parts = Vec::new();
    for id in chain(tree, symbol) {
        let data = tree.get(id);
        let mut part = match data.ident_or_op() {
            Some(IdentOrOp::Ident(ident)) => ident.as_str().to_string(),
            Some(IdentOrOp::Op(op)) => operator_alias(op),
            None => continue,
        };
        if let Some(args) = data.template_args() {
            part.push_str(&strip_ws(&args.to_string()));
        }
        parts.push(part);
    }
    let mut out = parts.join(".");
    if let Some(pq) = tree
        .get(symbol)
        .declaration()
        .and_then(|d| d.function_params())
    {
        out.push_str(&overload_suffix(pq));
    }
    out
}

/// Readable operator aliases in the style of the original name-based scheme.
fn operator_alias(op: &Operator) -> String {
    match op {
        Operator::BuildIn(text) => {
            let alias = match text.as_str() {
                "+" => "add",
                "-" => "sub",
                "*" => "mul",
                "/" => "div",
                "%" => "mod",
                "&" => "and",
                "|" => "or",
                "^" => "xor",
                "=" => "assign",
                "+=" => "add-assign",
                "-=" => "sub-assign",
                "*=" => "mul-assign",
                "/=" => "div-assign",
                "%=" => "mod-assign",
                "&=" => "and-assign",
                "|=" => "or-assign",
                "^=" => "xor-assign",
                "<<" => "lshift",
                ">>" => "rshift",
                "<<=" => "lshift-assign",
                ">>=" => "rshift-assign",
                "==" => "eq",
                "!=" => "neq",
                "<" => "lt",
                ">" => "gt",
                "<=" => "lte",
                ">=" => "gte",
                "<=>" => "spaceship",
                "&&" => "sand",
                "||" => "sor",
                "++" => "inc",
                "--" => "dec",
                "," => "comma",
                "->*" => "pointer-by-pointer",
                "->" => "pointer",
                "()" => "call",
                "[]" => "subscript",
                "!" => "not",
                "~" => "inv",
                "new" => "new",
                "new[]" => "new-array",
                "delete" => "delete",
                "delete[]" => "delete-array",
                other => return format!("{}-operator", strip_ws(other)),
            };
            format!("{alias}-operator")
        },
        Operator::Literal(ident) => format!("lit-{}-operator", ident),
        Operator::Cast(ty) => format!("castto-{}-operator", strip_ws(&ty.to_string())),
    }
}

fn overload_suffix(pq: &ParametersQualifiers) -> String {
    let mut out = String::new();
    if !pq.args.is_empty() {
        out.push_str("__");
        let mut first = true;
        for param in &pq.args {
            if !first {
                out.push('.');
            }
            first = false;
            if param.ellipsis {
                out.push_str("z");
            } else if let Some(arg) = &param.arg {
                out.push_str(&strip_ws(&arg.ty.abstract_text()));
            }
        }
    }
    if pq.const_ {
        out.push('C');
    }
    if pq.volatile_ {
        out.push('V');
    }
    match pq.ref_qual {
        Some(RefQualifier::LValue) => out.push('R'),
        Some(RefQualifier::RValue) => out.push('O'),
        None => {},
    }
    out
}

// ---- legacy scheme (version 1) --------------------------------------------

fn legacy_id(tree: &SymbolTree, symbol: SymbolId) -> Result<String, IdError> {
    let data = tree.get(symbol);
    if let Some(decl) = data.declaration() {
        // Constructs outside the mangling subset.
        if decl.trailing_requires.is_some() {
            return Err(IdError::NoLegacyId);
        }
        if let Some(prefix) = &decl.template_prefix {
            for item in &prefix.templates {
                match item {
                    TemplatePrefixItem::Introduction(_) => return Err(IdError::NoLegacyId),
                    TemplatePrefixItem::Params(params) if params.requires_clause.is_some() => {
                        return Err(IdError::NoLegacyId);
                    },
                    TemplatePrefixItem::Params(_) => {},
                }
            }
        }
        if decl.object_type == ObjectType::Concept {
            return Err(IdError::NoLegacyId);
        }
    }

    let ids = chain(tree, symbol);
    let mut components = Vec::new();
    for id in ids {
        let data = tree.get(id);
        let mut part = match data.ident_or_op() {
            Some(IdentOrOp::Ident(ident)) => {
                if ident.is_anonymous() {
                    return Err(IdError::NoLegacyId);
                }
                source_name(ident.as_str())
            },
            Some(IdentOrOp::Op(op)) => mangle_operator(op)?,
            None => continue,
        };
        if let Some(args) = data.template_args() {
            part.push_str(&mangle_template_args(args)?);
        }
        components.push(part);
    }

    let pq = tree
        .get(symbol)
        .declaration()
        .and_then(|d| d.function_params());

    let mut out = String::from("_CPPv1");
    if components.len() > 1 {
        out.push('N');
        if let Some(pq) = pq {
            if pq.const_ {
                out.push('K');
            }
            if pq.volatile_ {
                out.push('V');
            }
            match pq.ref_qual {
                Some(RefQualifier::LValue) => out.push('R'),
                Some(RefQualifier::RValue) => out.push('O'),
                None => {},
            }
        }
        for part in &components {
            out.push_str(part);
        }
        out.push('E');
    } else {
        for part in &components {
            out.push_str(part);
        }
    }

    if let Some(pq) = pq {
        if pq.args.is_empty() {
            out.push('v');
        } else {
            for param in &pq.args {
                if param.ellipsis {
                    out.push('z');
                } else if let Some(arg) = &param.arg {
                    out.push_str(&mangle_type(&arg.ty)?);
                }
            }
        }
    }
    Ok(out)
}

fn source_name(name: &str) -> String {
    format!("{}{}", name.len(), name)
}

fn mangle_operator(op: &Operator) -> Result<String, IdError> {
    let code = match op {
        Operator::BuildIn(text) => match text.as_str() {
            "new" => "nw",
            "new[]" => "na",
            "delete" => "dl",
            "delete[]" => "da",
            "+" => "pl",
            "-" => "mi",
            "*" => "ml",
            "/" => "dv",
            "%" => "rm",
            "&" => "an",
            "|" => "or",
            "^" => "eo",
            "=" => "aS",
            "+=" => "pL",
            "-=" => "mI",
            "*=" => "mL",
            "/=" => "dV",
            "%=" => "rM",
            "&=" => "aN",
            "|=" => "oR",
            "^=" => "eO",
            "<<" => "ls",
            ">>" => "rs",
            "<<=" => "lS",
            ">>=" => "rS",
            "==" => "eq",
            "!=" => "ne",
            "<" => "lt",
            ">" => "gt",
            "<=" => "le",
            ">=" => "ge",
            "<=>" => "ss",
            "&&" => "aa",
            "||" => "oo",
            "++" => "pp",
            "--" => "mm",
            "," => "cm",
            "->*" => "pm",
            "->" => "pt",
            "()" => "cl",
            "[]" => "ix",
            "!" => "nt",
            "~" => "co",
            _ => return Err(IdError::NoLegacyId),
        },
        Operator::Cast(ty) => return Ok(format!("cv{}", mangle_type(ty)?)),
        Operator::Literal(_) => return Err(IdError::NoLegacyId),
    };
    Ok(code.to_string())
}

fn mangle_template_args(args: &TemplateArgs) -> Result<String, IdError> {
    let mut out = String::from("I");
    for arg in &args.args {
        match arg {
            TemplateArg::Type(ty) => out.push_str(&mangle_type(ty)?),
            TemplateArg::Constant(expr) => {
                if matches!(expr, Expr::Fallback(_)) {
                    return Err(IdError::NoLegacyId);
                }
                out.push('L');
                out.push_str(&strip_ws(&expr.to_string()));
                out.push('E');
            },
        }
    }
    out.push('E');
    Ok(out)
}

fn mangle_type(ty: &Type) -> Result<String, IdError> {
    let specs = &ty.decl_specs;
    let mut base = match &specs.trailing {
        None => return Err(IdError::NoLegacyId),
        Some(TrailingTypeSpec::Fundamental(names)) => fundamental_code(&names.join(" "))?,
        Some(TrailingTypeSpec::DecltypeAuto) => "Dc".to_string(),
        Some(TrailingTypeSpec::Decltype(_)) => return Err(IdError::NoLegacyId),
        Some(TrailingTypeSpec::Name {
            name, placeholder, ..
        }) => {
            if placeholder.is_some() {
                return Err(IdError::NoLegacyId);
            }
            mangle_nested_name(name)?
        },
    };
    let merged = specs.merged_simple();
    if merged.volatile_ {
        base = format!("V{base}");
    }
    if merged.const_ {
        base = format!("K{base}");
    }
    mangle_declarator(&ty.decl, base)
}

fn mangle_declarator(decl: &Declarator, base: String) -> Result<String, IdError> {
    match decl {
        Declarator::Ptr {
            next,
            const_,
            volatile_,
            ..
        } => {
            let mut wrapped = format!("P{base}");
            if *volatile_ {
                wrapped = format!("V{wrapped}");
            }
            if *const_ {
                wrapped = format!("K{wrapped}");
            }
            mangle_declarator(next, wrapped)
        },
        Declarator::Ref { next, rvalue, .. } => {
            let prefix = if *rvalue { "O" } else { "R" };
            mangle_declarator(next, format!("{prefix}{base}"))
        },
        Declarator::ParamPack { next } => mangle_declarator(next, format!("Dp{base}")),
        Declarator::MemPtr {
            class_name, next, ..
        } => {
            let class = mangle_nested_name(class_name)?;
            mangle_declarator(next, format!("M{class}{base}"))
        },
        Declarator::NameParamQual {
            array_ops,
            param_qual,
            ..
        } => {
            if param_qual.is_some() {
                // Function types are outside the approximation.
                return Err(IdError::NoLegacyId);
            }
            let mut out = base;
            for _ in array_ops {
                out = format!("A_{out}");
            }
            Ok(out)
        },
        Declarator::NameBitField { .. } | Declarator::Paren { .. } => Err(IdError::NoLegacyId),
    }
}

fn mangle_nested_name(name: &NestedName) -> Result<String, IdError> {
    let mut parts = Vec::new();
    for element in &name.names {
        let mut part = match &element.ident_or_op {
            IdentOrOp::Ident(ident) => {
                if ident.is_anonymous() {
                    return Err(IdError::NoLegacyId);
                }
                source_name(ident.as_str())
            },
            IdentOrOp::Op(_) => return Err(IdError::NoLegacyId),
        };
        if let Some(args) = &element.template_args {
            part.push_str(&mangle_template_args(args)?);
        }
        parts.push(part);
    }
    if parts.len() > 1 {
        Ok(format!("N{}E", parts.concat()))
    } else {
        Ok(parts.concat())
    }
}

fn fundamental_code(text: &str) -> Result<String, IdError> {
    let code = match text {
        "void" => "v",
        "bool" => "b",
        "char" => "c",
        "signed char" => "a",
        "unsigned char" => "h",
        "wchar_t" => "w",
        "char8_t" => "Du",
        "char16_t" => "Ds",
        "char32_t" => "Di",
        "short" | "short int" | "signed short" | "signed short int" => "s",
        "unsigned short" | "unsigned short int" => "t",
        "int" | "signed" | "signed int" => "i",
        "unsigned" | "unsigned int" => "j",
        "long" | "long int" | "signed long" | "signed long int" => "l",
        "unsigned long" | "unsigned long int" => "m",
        "long long" | "long long int" | "signed long long" | "signed long long int" => "x",
        "unsigned long long" | "unsigned long long int" => "y",
        "float" => "f",
        "double" => "d",
        "long double" => "e",
        "auto" => "Da",
        _ => return Err(IdError::NoLegacyId),
    };
    Ok(code.to_string())
}
