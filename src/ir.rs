// Strongly-typed IR for TypeScript codegen. No serde_json::Value here.

#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Unknown,                 // no usable shape (e.g. array without `items`)
    Boolean,
    Integer,
    Number,
    String { enum_: Vec<String> },
    Array(Box<Ty>),
    Map,                     // object without declared properties
    Object {
        name: String,        // emitted as its own interface
        fields: Vec<Field>,  // schema property order
    },
    Nullable(Box<Ty>),       // `nullable: true`
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
    pub required: bool,      // listed in the parent's `required`
    pub description: Option<String>,
}
