//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation. Output is fully determined by the input nodes; nothing here
//! consults maps with unspecified iteration order.

use super::types::{
    BinOp, NamespaceItem, ObjectEntry, TemplatePart, TsClass, TsExpr, TsFunction, TsImport,
    TsItem, TsLiteral, TsMethod, TsModule, TsNamespace, TsParam, TsPrimitive, TsProp, TsStmt,
    TsType, TsTypeDef, TypeDefKind,
};
use super::utils::{escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

/// Prefix every non-empty line with `levels` indentation steps.
fn indent_lines(code: &str, levels: usize) -> String {
    let prefix = "  ".repeat(levels);
    code.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{prefix}{line}\n")
            }
        })
        .collect()
}

fn emit_list<T: Emit>(items: &[T], separator: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(separator)
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Any => "any".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => emit_list(types, " | "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", emit_list(props, "; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => format!("{}<{}>", name, emit_list(args, ", ")),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let readonly = if self.readonly { "readonly " } else { "" };
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}{}: {}", readonly, key, opt, self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        match &self.kind {
            TypeDefKind::Interface { properties } => {
                if properties.is_empty() {
                    return format!("export interface {} {{}}\n", self.name);
                }
                let mut output = format!("export interface {} {{\n", self.name);
                for prop in properties {
                    output.push_str(&format!("  {};\n", prop.emit()));
                }
                output.push_str("}\n");
                output
            }
            TypeDefKind::Union { variants } => {
                if variants.is_empty() {
                    return format!("export type {} = never;\n", self.name);
                }
                let mut output = format!("export type {} =", self.name);
                for variant in variants {
                    output.push_str(&format!("\n  | {}", variant.emit()));
                }
                output.push_str(";\n");
                output
            }
            TypeDefKind::ConstEnum { values } => {
                let union = values
                    .iter()
                    .map(|(_, value)| value.emit())
                    .collect::<Vec<_>>()
                    .join(" | ");
                let mut output = format!("export type {} = {};\n", self.name, union);
                output.push_str(&format!("export const {} = {{\n", self.name));
                for (key, value) in values {
                    output.push_str(&format!("  {}: {},\n", quote_if_needed(key), value.emit()));
                }
                output.push_str("} as const;\n");
                output
            }
            TypeDefKind::NativeEnum { values } => {
                let mut output = format!("export enum {} {{\n", self.name);
                for (key, value) in values {
                    output.push_str(&format!("  {} = {},\n", quote_if_needed(key), value));
                }
                output.push_str("}\n");
                output
            }
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::StrictEqual => "===".to_string(),
        }
    }
}

impl Emit for ObjectEntry {
    fn emit(&self) -> String {
        match self {
            ObjectEntry::Prop(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjectEntry::Computed(key, value) => format!("[{}]: {}", key.emit(), value.emit()),
            ObjectEntry::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let type_args_str = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", emit_list(type_args, ", "))
                };
                format!("{}{}({})", callee.emit(), type_args_str, emit_list(args, ", "))
            }
            TsExpr::Arrow { params, body } => {
                let body_str = body.emit();
                // An object literal body must be parenthesized to not read as a block
                if matches!(**body, TsExpr::Object(_)) {
                    format!("({}) => ({})", emit_list(params, ", "), body_str)
                } else {
                    format!("({}) => {}", emit_list(params, ", "), body_str)
                }
            }
            TsExpr::Object(entries) => {
                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", emit_list(entries, ", "))
                }
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit(), prop)
            }
            TsExpr::OptionalMember { object, prop } => {
                format!("{}?.{}", object.emit(), prop)
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => s.replace('`', "\\`").replace("${", "\\${"),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Await(expr) => {
                format!("await {}", expr.emit())
            }
            TsExpr::BinOp { left, op, right } => {
                format!("{} {} {}", left.emit(), op.emit(), right.emit())
            }
            TsExpr::Array(items) => {
                format!("[{}]", emit_list(items, ", "))
            }
            TsExpr::Cast { expr, ty } => {
                format!("{} as {}", expr.emit(), ty.emit())
            }
        }
    }
}

impl TsExpr {
    /// Emit with object literals broken over lines (one entry per line).
    ///
    /// Nested object literals are broken as well; everything else is emitted inline.
    pub fn emit_block(&self, indent: usize) -> String {
        match self {
            TsExpr::Object(entries) if !entries.is_empty() => {
                let prefix = "  ".repeat(indent + 1);
                let mut output = "{\n".to_string();
                for entry in entries {
                    let line = match entry {
                        ObjectEntry::Prop(key, value) => {
                            format!("{}: {}", quote_if_needed(key), value.emit_block(indent + 1))
                        }
                        ObjectEntry::Computed(key, value) => {
                            format!("[{}]: {}", key.emit(), value.emit_block(indent + 1))
                        }
                        ObjectEntry::Spread(expr) => format!("...{}", expr.emit()),
                    };
                    output.push_str(&format!("{prefix}{line},\n"));
                }
                output.push_str(&format!("{}}}", "  ".repeat(indent)));
                output
            }
            other => other.emit(),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let ty = self
            .ty
            .as_ref()
            .map(|ty| format!(": {}", ty.emit()))
            .unwrap_or_default();
        let default = self
            .default
            .as_ref()
            .map(|d| format!(" = {}", d.emit()))
            .unwrap_or_default();
        format!("{}{}{}", self.name, ty, default)
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Const { name, init } => {
                format!("{}const {} = {};\n", prefix, name, init.emit())
            }
            TsStmt::Expr(expr) => {
                format!("{}{};\n", prefix, expr.emit())
            }
            TsStmt::Return(expr) => {
                format!("{}return {};\n", prefix, expr.emit_block(indent))
            }
            TsStmt::Switch {
                discriminant,
                cases,
                default,
            } => {
                let mut output = format!("{}switch ({}) {{\n", prefix, discriminant.emit());
                let case_prefix = "  ".repeat(indent + 1);
                for case in cases {
                    output.push_str(&format!("{}case {}: {{\n", case_prefix, case.test.emit()));
                    for stmt in &case.body {
                        output.push_str(&stmt.emit_indented(indent + 2));
                    }
                    output.push_str(&format!("{case_prefix}}}\n"));
                }
                output.push_str(&format!("{case_prefix}default:\n"));
                for stmt in default {
                    output.push_str(&stmt.emit_indented(indent + 2));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();

        if let Some(doc) = &self.doc {
            output.push_str(&format!("/** {doc} */\n"));
        }

        output.push_str("export ");

        let params_str = emit_list(&self.params, ", ");

        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();

        let async_str = if self.is_async { "async " } else { "" };

        let body = if self.body.is_empty() {
            " {}".to_string()
        } else {
            let mut body = " {\n".to_string();
            for stmt in &self.body {
                body.push_str(&stmt.emit_indented(1));
            }
            body.push('}');
            body
        };

        if self.is_arrow {
            // Arrow function: export const name = (outer) => async (...): Type => { ... };
            let curried = self
                .curried
                .as_ref()
                .map(|outer| format!("({}) => ", emit_list(outer, ", ")))
                .unwrap_or_default();
            output.push_str(&format!(
                "const {} = {}{}({}){} =>{};\n",
                self.name, curried, async_str, params_str, return_type_str, body
            ));
        } else {
            output.push_str(&format!(
                "{}function {}({}){}{}\n",
                async_str, self.name, params_str, return_type_str, body
            ));
        }

        output
    }
}

// =============================================================================
// Classes and Namespaces
// =============================================================================

impl Emit for TsMethod {
    fn emit(&self) -> String {
        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();
        let mut output = format!("{}(){} {{\n", self.name, return_type_str);
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for TsClass {
    fn emit(&self) -> String {
        let mut output = format!("export class {} {{\n", self.name);
        for prop in &self.properties {
            let readonly = if prop.readonly { "readonly " } else { "" };
            // Members are filled from API payloads, never by a constructor.
            let marker = if prop.optional { "?" } else { "!" };
            output.push_str(&format!(
                "  {}{}{}: {};\n",
                readonly,
                quote_if_needed(&prop.name),
                marker,
                prop.ty.emit()
            ));
        }
        for method in &self.methods {
            output.push('\n');
            output.push_str(&indent_lines(&method.emit(), 1));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for NamespaceItem {
    fn emit(&self) -> String {
        match self {
            NamespaceItem::TypeDef(def) => def.emit(),
            NamespaceItem::Const { name, init } => {
                format!("export const {} = {};\n", name, init.emit_block(0))
            }
        }
    }
}

impl Emit for TsNamespace {
    fn emit(&self) -> String {
        let body = self
            .items
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join("\n");
        format!("export namespace {} {{\n{}}}\n", self.name, indent_lines(&body, 1))
    }
}

impl Emit for TsItem {
    fn emit(&self) -> String {
        match self {
            TsItem::TypeDef(def) => def.emit(),
            TsItem::Const { name, ty, init } => {
                let ty_str = ty.as_ref().map(|t| format!(": {}", t.emit())).unwrap_or_default();
                format!("export const {}{} = {};\n", name, ty_str, init.emit_block(0))
            }
            TsItem::Function(func) => func.emit(),
            TsItem::Class(class) => class.emit(),
            TsItem::Namespace(namespace) => namespace.emit(),
        }
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        let mut bindings = Vec::new();
        if let Some(default) = &self.default {
            bindings.push(default.clone());
        }
        if !self.items.is_empty() {
            bindings.push(format!("{{ {} }}", self.items.join(", ")));
        }
        format!(
            "import {}{} from \"{}\";\n",
            type_keyword,
            bindings.join(", "),
            escape_js_string(&self.from)
        )
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.banner {
            output.push_str(line);
            output.push('\n');
        }

        for import in &self.imports {
            output.push_str(&import.emit());
        }

        let items = self.items.iter().map(Emit::emit).collect::<Vec<_>>();
        if !items.is_empty() {
            if !self.banner.is_empty() || !self.imports.is_empty() {
                output.push('\n');
            }
            output.push_str(&items.join("\n"));
        }

        output
    }
}

// =============================================================================
// Tests
// =============================================================================
