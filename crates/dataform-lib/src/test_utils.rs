//! Test utilities and snapshot macros.

use dataform_core::{
    AssignmentStmt, CallArg, CallExpr, ClassDef, ClassId, ClassInfo, ClassRegistry, Expr,
    FuncDef, Literal, NameExpr, Position, Statement, Type, TypeBinding,
};

use crate::{Config, Diagnostics, Outcome, dump_class, transform_class};

/// Module every test class lives in.
pub const MODULE: &str = "m";

/// Snapshot test for a transformed class: its dump, then its diagnostics.
#[macro_export]
macro_rules! shot_class {
    ($program:expr, $id:expr, @$snap:literal) => {{
        let output = $program.render($id);
        insta::assert_snapshot!(output, @$snap);
    }};
}

/// `int` is `builtins.int`; dotted names are taken as they are.
pub fn ty(name: &str) -> Type {
    if name.contains('.') {
        Type::instance(name)
    } else {
        Type::instance(format!("builtins.{name}"))
    }
}

pub fn bool_expr(value: bool) -> Expr {
    Expr::Literal(Literal::Bool(value))
}

/// `dataclasses.field(...)` with the given keywords.
pub fn field_call(keywords: Vec<(&str, Expr)>) -> Expr {
    Expr::Call(CallExpr {
        callee: Box::new(Expr::Name(
            NameExpr::new("field").with_fullname("dataclasses.field"),
        )),
        args: keywords
            .into_iter()
            .map(|(name, value)| CallArg::keyword(name, value))
            .collect(),
    })
}

/// Builds a class body one line at a time, starting at line 2.
pub struct ClassBuilder {
    name: String,
    decorators: Vec<Expr>,
    flags: Vec<CallArg>,
    body: Vec<Statement>,
}

impl ClassBuilder {
    /// A class decorated with a bare `@dataclass`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            decorators: vec![dataclass_decorator()],
            flags: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A class with no decorator.
    pub fn plain(name: &str) -> Self {
        Self {
            decorators: Vec::new(),
            ..Self::new(name)
        }
    }

    /// Decorator keyword, e.g. `order=True`.
    pub fn flag(self, name: &str, value: bool) -> Self {
        self.flag_expr(name, bool_expr(value))
    }

    pub fn flag_expr(mut self, name: &str, value: Expr) -> Self {
        self.flags.push(CallArg::keyword(name, value));
        self
    }

    /// `name: ty`
    pub fn field(self, name: &str, type_name: &str) -> Self {
        self.assign(name, Some(ty(type_name).into()), Expr::Empty)
    }

    /// `name: ty = 0`
    pub fn field_default(self, name: &str, type_name: &str) -> Self {
        self.assign(name, Some(ty(type_name).into()), Expr::Literal(Literal::Int(0)))
    }

    /// `name: ty = field(...)`
    pub fn field_with(self, name: &str, type_name: &str, spec: Expr) -> Self {
        self.assign(name, Some(ty(type_name).into()), spec)
    }

    /// `name: InitVar[ty]`
    pub fn init_var(self, name: &str, type_name: &str) -> Self {
        let wrapped = Type::generic("dataclasses.InitVar", vec![ty(type_name)]);
        self.assign(name, Some(wrapped.into()), Expr::Empty)
    }

    /// `name: ClassVar[ty] = 0`
    pub fn class_var(self, name: &str, type_name: &str) -> Self {
        let wrapped = Type::generic("typing.ClassVar", vec![ty(type_name)]);
        self.assign(name, Some(wrapped.into()), Expr::Literal(Literal::Int(0)))
    }

    /// `name: <unresolved>`
    pub fn pending(self, name: &str) -> Self {
        self.assign(name, Some(TypeBinding::Pending), Expr::Empty)
    }

    /// `name = 0`, not a declaration.
    pub fn plain_assign(self, name: &str) -> Self {
        self.assign(name, None, Expr::Literal(Literal::Int(0)))
    }

    /// `def name(self) -> None`
    pub fn method(mut self, name: &str) -> Self {
        let mut func = FuncDef::new(name, Vec::new(), Type::NoneType);
        func.fullname = format!("{MODULE}.{}.{name}", self.name);
        func.position = self.next_position();
        self.body.push(Statement::Func(func));
        self
    }

    fn assign(mut self, name: &str, annotation: Option<TypeBinding>, value: Expr) -> Self {
        let position = self.next_position();
        self.body.push(Statement::Assign(AssignmentStmt {
            target: NameExpr::new(name),
            annotation,
            value,
            position,
        }));
        self
    }

    fn next_position(&self) -> Position {
        Position::new(self.body.len() as u32 + 2, 4)
    }

    pub fn build(self) -> ClassInfo {
        let decorators = self
            .decorators
            .into_iter()
            .map(|decorator| match decorator {
                Expr::Name(name) if !self.flags.is_empty() => Expr::Call(CallExpr {
                    callee: Box::new(Expr::Name(name)),
                    args: self.flags.clone(),
                }),
                other => other,
            })
            .collect();
        let defn = ClassDef {
            name: self.name.clone(),
            decorators,
            body: self.body,
            position: Position::new(1, 0),
        };
        let mut info = ClassInfo::new(format!("{MODULE}.{}", self.name), defn);
        info.bind_declarations();
        info
    }
}

fn dataclass_decorator() -> Expr {
    Expr::Name(NameExpr::new("dataclass").with_fullname("dataclasses.dataclass"))
}

/// A registry with `builtins.object` and single-inheritance classes on top.
pub struct Program {
    pub registry: ClassRegistry,
    pub object: ClassId,
    pub config: Config,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        let mut registry = ClassRegistry::new();
        let object = registry.add(
            ClassInfo::new(
                "builtins.object",
                ClassDef {
                    name: "object".to_owned(),
                    decorators: Vec::new(),
                    body: Vec::new(),
                    position: Position::default(),
                },
            ),
            &[],
        );
        Self {
            registry,
            object,
            config: Config::default(),
        }
    }

    /// Register a class deriving from `object`.
    pub fn add(&mut self, class: ClassBuilder) -> ClassId {
        self.add_derived(class, self.object)
    }

    /// Register a class deriving from `base`.
    pub fn add_derived(&mut self, class: ClassBuilder, base: ClassId) -> ClassId {
        let ancestors = self.registry.get(base).map(|info| info.mro.clone()).unwrap_or_default();
        self.registry.add(class.build(), &ancestors)
    }

    /// Register a class with an explicit linearization, the class itself excluded.
    ///
    /// `object` is appended when missing.
    pub fn add_with_mro(&mut self, class: ClassBuilder, ancestors: &[ClassId]) -> ClassId {
        let mut mro = ancestors.to_vec();
        if mro.last() != Some(&self.object) {
            mro.push(self.object);
        }
        self.registry.add(class.build(), &mro)
    }

    /// Replace the decorator of a registered class with the one `class` would get.
    pub fn redecorate(&mut self, id: ClassId, class: ClassBuilder) {
        let decorators = class.build().defn.decorators;
        self.registry
            .get_mut(id)
            .expect("registered class")
            .defn
            .decorators = decorators;
    }

    /// Change the type of a declared field, as a re-analysis of its annotation would.
    pub fn retype(&mut self, id: ClassId, name: &str, ty: TypeBinding) {
        let info = self.registry.get_mut(id).expect("registered class");
        let var = info
            .names
            .get_mut(name)
            .and_then(|node| node.node.as_var_mut())
            .expect("declared field");
        var.ty = ty;
    }

    pub fn info(&self, id: ClassId) -> &ClassInfo {
        self.registry.get(id).expect("registered class")
    }

    /// Rebind the class body, as the analyzer does before each run, then transform it.
    pub fn transform(&mut self, id: ClassId) -> (Outcome, Diagnostics) {
        self.registry
            .get_mut(id)
            .expect("registered class")
            .bind_declarations();
        let mut diag = Diagnostics::new();
        let outcome = transform_class(&mut self.registry, id, &self.config, &mut diag)
            .expect("transform succeeds");
        (outcome, diag)
    }

    pub fn dump(&self, id: ClassId) -> String {
        dump_class(self.info(id), &self.config)
    }

    /// Transform, then render either the defer reason or the dump and diagnostics.
    pub fn render(&mut self, id: ClassId) -> String {
        let (outcome, diag) = self.transform(id);
        match outcome {
            Outcome::Deferred(reason) => format!("deferred: {reason}"),
            Outcome::Synthesized(_) => {
                format!("{}---\n{}", self.dump(id), diag.render_plain())
            }
        }
    }
}
