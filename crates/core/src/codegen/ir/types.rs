//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript representation the generator renders:
//! - TsType: Types (primitives, arrays, unions, objects, literals, references)
//! - TsExpr: Expressions (identifiers, calls, arrows, object literals, etc.)
//! - TsStmt: Statements inside function and method bodies
//! - TsItem: Module-level declarations (type definitions, constants, functions,
//!   classes and namespaces)
//!
//! Types that also live in the model IR derive `Serialize` so they take part in
//! the artifact fingerprint.

use serde::Serialize;

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, void, unknown, any
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        /// Key type
        key: Box<TsType>,
        /// Value type
        value: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Named type reference: "Recipe", "Recipe.CategoryDef"
    Ref(String),
    /// Generic application: Dispatch<Action>, Promise<void>
    Generic {
        /// Generic type name
        name: String,
        /// Type arguments, in order
        args: Vec<TsType>,
    },
}

impl TsType {
    /// `string`
    pub fn string() -> Self {
        TsType::Primitive(TsPrimitive::String)
    }

    /// `number`
    pub fn number() -> Self {
        TsType::Primitive(TsPrimitive::Number)
    }

    /// `boolean`
    pub fn boolean() -> Self {
        TsType::Primitive(TsPrimitive::Boolean)
    }

    /// Reference to a named type.
    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Ref(name.into())
    }

    /// `inner[]`
    pub fn array_of(inner: TsType) -> Self {
        TsType::Array(Box::new(inner))
    }

    /// `T | null` when `nullable`, `T` otherwise.
    pub fn nullable_if(self, nullable: bool) -> Self {
        if nullable {
            TsType::Union(vec![self, TsType::Primitive(TsPrimitive::Null)])
        } else {
            self
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TsPrimitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `void`
    Void,
    /// `unknown`
    Unknown,
    /// `any`
    Any,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsProp {
    /// Property name, quoted on emission when it is not a valid identifier
    pub name: String,
    /// Property type
    pub ty: TsType,
    /// Emitted with `?`
    pub optional: bool,
    /// Emitted with `readonly`
    pub readonly: bool,
}

impl TsProp {
    /// A required, mutable property.
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
        }
    }
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TsLiteral {
    /// Double-quoted string
    String(String),
    /// Floating-point number
    Number(f64),
    /// Integer
    Int(i64),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", 42
    Literal(TsLiteral),
    /// Function call: foo(a, b), optionally with type arguments: foo<T>(a)
    Call {
        /// Called expression
        callee: Box<TsExpr>,
        /// Explicit type arguments, omitted when empty
        type_args: Vec<TsType>,
        /// Call arguments
        args: Vec<TsExpr>,
    },
    /// Arrow function with expression body: (x) => x.foo
    Arrow {
        /// Untyped or typed parameters
        params: Vec<TsParam>,
        /// Expression body; object literals are parenthesized
        body: Box<TsExpr>,
    },
    /// Object literal: { a: 1, [key]: value, ...rest }
    Object(Vec<ObjectEntry>),
    /// Member access: foo.bar
    Member {
        /// Accessed object
        object: Box<TsExpr>,
        /// Property name
        prop: String,
    },
    /// Optional chaining member access: foo?.bar
    OptionalMember {
        /// Accessed object
        object: Box<TsExpr>,
        /// Property name
        prop: String,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// Binary comparison: a === b
    BinOp {
        /// Left operand
        left: Box<TsExpr>,
        /// Operator
        op: BinOp,
        /// Right operand
        right: Box<TsExpr>,
    },
    /// Array literal: [a, b, c]
    Array(Vec<TsExpr>),
    /// Type cast: expr as Type
    Cast {
        /// Cast expression
        expr: Box<TsExpr>,
        /// Target type
        ty: TsType,
    },
}

impl TsExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// String literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    /// `self.prop`
    pub fn member(self, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(self),
            prop: prop.into(),
        }
    }

    /// `self(args)`
    pub fn call(self, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(self),
            type_args: vec![],
            args,
        }
    }

    /// `literal as literal`, keeping the literal type after the value is serialized.
    pub fn literal_as_const(lit: TsLiteral) -> Self {
        TsExpr::Cast {
            expr: Box::new(TsExpr::Literal(lit.clone())),
            ty: TsType::Literal(lit),
        }
    }
}

/// Entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// key: value
    Prop(String, TsExpr),
    /// [key]: value
    Computed(TsExpr, TsExpr),
    /// ...expr
    Spread(TsExpr),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `===`
    StrictEqual,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Binding name
    pub name: String,
    /// Type annotation, if any
    pub ty: Option<TsType>,
    /// Default value: `state = initialState`
    pub default: Option<TsExpr>,
}

impl TsParam {
    /// `name: ty`
    pub fn typed(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
        }
    }

    /// `name`, type left to inference
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    /// Default import binding: `import http from "axios"`
    pub default: Option<String>,
    /// Named items to import
    pub items: Vec<String>,
    /// Module path
    pub from: String,
    /// Whether this is a type-only import
    pub type_only: bool,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo { ... }
    Interface {
        /// Members, in order
        properties: Vec<TsProp>,
    },
    /// type Foo =
    ///   | A
    ///   | B;
    Union {
        /// Union members, in order; `never` when empty
        variants: Vec<TsType>,
    },
    /// type Foo = "a" | "b"; const Foo = { A: "a", B: "b" } as const;
    ConstEnum {
        /// `(key, value)` pairs in declaration order
        values: Vec<(String, TsLiteral)>,
    },
    /// enum Foo { A = 1, B = 2 }
    NativeEnum {
        /// `(key, value)` pairs in declaration order
        values: Vec<(String, i64)>,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Exported type name
    pub name: String,
    /// What the name is bound to
    pub kind: TypeDefKind,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// `const name = init;`
    Const {
        /// Binding name
        name: String,
        /// Initializer
        init: TsExpr,
    },
    /// Expression statement
    Expr(TsExpr),
    /// Return statement; object literals are broken over lines
    Return(TsExpr),
    /// switch (discriminant) { case ...: ... default: ... }
    Switch {
        /// Switched-on expression
        discriminant: TsExpr,
        /// `case` arms, each wrapped in its own block
        cases: Vec<SwitchCase>,
        /// Statements of the `default:` arm
        default: Vec<TsStmt>,
    },
}

/// One `case` arm of a switch statement
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Matched value
    pub test: TsExpr,
    /// Arm body
    pub body: Vec<TsStmt>,
}

/// Function definition, always exported
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunction {
    /// Exported name
    pub name: String,
    /// JSDoc line emitted above the declaration
    pub doc: Option<String>,
    /// Outer parameter list of a curried arrow: `(id) => async (dispatch) => { ... }`
    pub curried: Option<Vec<TsParam>>,
    /// Parameters of the (inner) function
    pub params: Vec<TsParam>,
    /// Declared return type
    pub return_type: Option<TsType>,
    /// Body statements
    pub body: Vec<TsStmt>,
    /// `async` on the (inner) function
    pub is_async: bool,
    /// `export const name = ... =>` instead of `export function name`
    pub is_arrow: bool,
}

/// Parameterless class method
#[derive(Debug, Clone, PartialEq)]
pub struct TsMethod {
    /// Method name
    pub name: String,
    /// Declared return type
    pub return_type: Option<TsType>,
    /// Body statements
    pub body: Vec<TsStmt>,
}

/// Class declaration; properties use definite assignment (`name!: T`).
#[derive(Debug, Clone, PartialEq)]
pub struct TsClass {
    /// Exported class name
    pub name: String,
    /// Members, in order
    pub properties: Vec<TsProp>,
    /// Methods, after the members
    pub methods: Vec<TsMethod>,
}

/// Declaration inside a namespace
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceItem {
    /// Exported type definition
    TypeDef(TsTypeDef),
    /// `export const name = init;`
    Const {
        /// Binding name
        name: String,
        /// Initializer
        init: TsExpr,
    },
}

/// namespace Foo { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct TsNamespace {
    /// Namespace name, merged with the class of the same name
    pub name: String,
    /// Declarations, separated by blank lines
    pub items: Vec<NamespaceItem>,
}

/// Module-level declaration, emitted in insertion order
#[derive(Debug, Clone, PartialEq)]
pub enum TsItem {
    /// Exported type definition
    TypeDef(TsTypeDef),
    /// `export const name: ty = init;`
    Const {
        /// Binding name
        name: String,
        /// Type annotation, if any
        ty: Option<TsType>,
        /// Initializer
        init: TsExpr,
    },
    /// Exported function
    Function(TsFunction),
    /// Exported class
    Class(TsClass),
    /// Exported namespace
    Namespace(TsNamespace),
}

/// Complete TypeScript module
#[derive(Debug, Clone, PartialEq)]
pub struct TsModule {
    /// Comment lines emitted before the imports
    pub banner: Vec<String>,
    /// Import statements
    pub imports: Vec<TsImport>,
    /// Declarations, in output order
    pub items: Vec<TsItem>,
}
