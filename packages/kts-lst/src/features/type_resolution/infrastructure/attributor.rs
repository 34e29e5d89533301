//! Type attribution pass
//!
//! Walks a lossless tree once, in source order, and attaches a [`TypeRef`]
//! to every typed node. Lookups follow Kotlin's lexical rules closely
//! enough for matching: locals shadow lambda receivers, which shadow the
//! script's implicit receivers and template, which shadow imported types.
//!
//! A name nobody provides becomes `Unresolved` plus one diagnostic. Nodes
//! whose receiver is already unresolved are marked `Unresolved` silently so
//! a single missing type is reported once. A node is only ever `Resolved`
//! to a type the resolver knows; a member whose declared type is missing
//! from the classpath is reported under that type's name.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::type_names::{kotlin_type_name, TypeNames};
use crate::features::classpath::domain::builtins::{function_arity, ACTION, KOTLIN_ANY, KOTLIN_STRING, KOTLIN_UNIT};
use crate::features::classpath::domain::{
    accessor_names, JvmType, MemberKind, MemberSignature, Resolution, TypeDescriptor,
};
use crate::features::classpath::ports::SymbolResolver;
use crate::features::lossless_tree::domain::{LstKind, TreeNode};
use crate::features::parsing::domain::BoundScript;
use crate::features::type_resolution::domain::TypeRef;
use crate::shared::models::{Diagnostic, Result, Severity};
use crate::shared::utils::{ensure_sufficient_stack, ScopeStack};

const FUNCTION_TYPE_PREFIX: &str = "kotlin.jvm.functions.Function";

/// Grammar containers whose identifier children are expressions
const EXPRESSION_CONTAINERS: &[&str] = &[
    "indexing_expression",
    "indexing_suffix",
    "spread_expression",
    "when_entry",
    "when_condition",
    "when_subject",
    "range_test",
    "property_delegate",
    "collection_literal",
    "directly_assignable_expression",
    "control_structure_body",
];

/// Annotate `tree` in place. Returns the `SymbolUnresolved` diagnostics.
pub fn attribute(
    tree: &mut TreeNode,
    resolver: &dyn SymbolResolver,
    script: &BoundScript,
    severity: Severity,
) -> Result<Vec<Diagnostic>> {
    let mut attributor = Attributor::new(resolver, script, severity);
    attributor.collect_functions(tree);
    attributor.scopes.push(FrameMeta::default());
    attributor.visit(tree)?;
    attributor.scopes.pop();

    debug!(
        unresolved = attributor.diagnostics.len(),
        "Attribution finished"
    );
    Ok(attributor.diagnostics)
}

#[derive(Debug, Clone)]
struct Binding {
    ty: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct FrameMeta {
    /// Implicit receiver of a lambda frame
    receiver: Option<String>,
}

#[derive(Debug, Clone)]
struct LocalFunction {
    arity: usize,
    /// Return type as written
    return_type: Option<String>,
    expression_body: bool,
}

struct CallTarget {
    type_ref: TypeRef,
    signature: Option<MemberSignature>,
    /// Report an unresolved result type at the call
    report: bool,
}

enum CallOutcome {
    Resolved(CallTarget),
    /// Nothing in scope provides the callee
    Missing(String),
    /// Receiver unknown; already reported elsewhere
    Cascaded(String),
}

enum Lookup {
    Typed(String),
    /// Declared, type unknown
    Untyped,
}

struct Attributor<'a> {
    resolver: &'a dyn SymbolResolver,
    script: &'a BoundScript,
    severity: Severity,
    scopes: ScopeStack<Binding, FrameMeta>,
    types: TypeNames<'a>,
    functions: FxHashMap<String, Vec<LocalFunction>>,
    type_parameters: FxHashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Attributor<'a> {
    fn new(resolver: &'a dyn SymbolResolver, script: &'a BoundScript, severity: Severity) -> Self {
        Self {
            resolver,
            script,
            severity,
            scopes: ScopeStack::new(),
            types: TypeNames::new(resolver, &script.default_imports),
            functions: FxHashMap::default(),
            type_parameters: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Script functions are visible before their declaration
    fn collect_functions(&mut self, tree: &TreeNode) {
        for function in tree.descendants(&LstKind::FunctionDeclaration) {
            let name = match function.child(&LstKind::Identifier) {
                Some(name) => name.text(),
                None => continue,
            };
            let arity = function
                .child(&LstKind::Parameters)
                .map(|params| params.named_children().count())
                .unwrap_or(0);
            let return_type = function
                .child(&LstKind::TypeReference)
                .and_then(type_reference_name);
            let expression_body = function
                .child(&LstKind::Block)
                .map(|body| body.children().first().and_then(TreeNode::token_text) == Some("="))
                .unwrap_or(false);
            self.functions.entry(name).or_default().push(LocalFunction {
                arity,
                return_type,
                expression_body,
            });
        }
    }

    /// Attribute `node`; returns its type when resolved
    fn visit(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        ensure_sufficient_stack(|| self.visit_node(node))
    }

    fn visit_node(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        match node.kind().clone() {
            LstKind::Literal(kind) => self.set_type(node, kind.builtin_type(), true),
            LstKind::StringLiteral => {
                self.visit_children(node)?;
                self.set_type(node, KOTLIN_STRING, true)
            }
            LstKind::Identifier => self.visit_identifier(node),
            LstKind::Call => self.visit_call(node),
            LstKind::Navigation => self.visit_navigation(node),
            LstKind::Infix => self.visit_infix(node),
            LstKind::PropertyDeclaration => {
                self.visit_property(node)?;
                Ok(None)
            }
            LstKind::VariableDeclaration => {
                self.visit_variable(node, None)?;
                Ok(None)
            }
            LstKind::Parameter => {
                self.visit_parameter(node)?;
                Ok(None)
            }
            LstKind::FunctionDeclaration | LstKind::ClassDeclaration | LstKind::Block => {
                self.scopes.push(FrameMeta::default());
                let result = self.visit_children(node);
                self.scopes.pop();
                result.map(|_| None)
            }
            LstKind::Lambda => {
                self.visit_lambda(node, None, &[])?;
                Ok(None)
            }
            LstKind::TypeReference => self.visit_type_reference(node),
            LstKind::Import => {
                self.visit_import(node)?;
                Ok(None)
            }
            LstKind::PackageHeader => {
                if let Some(name) = node.child(&LstKind::Identifier) {
                    self.types.set_package(strip_whitespace(&name.text()));
                }
                Ok(None)
            }
            LstKind::This => Ok(self.this_type()),
            LstKind::Parenthesized => self.visit_children(node),
            LstKind::Other(ref name) if name == "type_parameter" => {
                if let Some(param) = node.children().iter().find(|c| is_other(c.kind(), "type_identifier")) {
                    self.type_parameters.insert(param.text());
                }
                self.visit_children(node).map(|_| None)
            }
            LstKind::Other(ref name) if name == "catch_block" => {
                self.scopes.push(FrameMeta::default());
                let result = self.visit_catch(node);
                self.scopes.pop();
                result.map(|_| None)
            }
            _ => self.visit_children(node).map(|_| None),
        }
    }

    /// Visit children in order; the type of the last typed child is returned
    fn visit_children(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        let parent = node.kind().clone();
        let in_expression: Vec<bool> = (0..node.children().len())
            .map(|i| identifier_in_expression(&parent, node.children(), i))
            .collect();

        let mut last = None;
        for (child, in_expression) in node.children_mut().iter_mut().zip(in_expression) {
            if child.kind() == &LstKind::Identifier && !in_expression {
                continue;
            }
            if let Some(ty) = self.visit(child)? {
                last = Some(ty);
            }
        }
        Ok(last)
    }

    // ── Names ────────────────────────────────────────────────────────────

    fn visit_identifier(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        // dotted names (`a.b.c` in headers) are not expressions
        let name = match node.token_text() {
            Some(text) => text.trim_matches('`').to_string(),
            None => return Ok(None),
        };
        match self.lookup_value(&name)? {
            Some(Lookup::Typed(ty)) => self.set_type(node, &ty, true),
            Some(Lookup::Untyped) => {
                self.set_unresolved(node, &name, false);
                Ok(None)
            }
            None => {
                self.set_unresolved(node, &name, true);
                Ok(None)
            }
        }
    }

    /// Locals, then receiver properties, then type names
    fn lookup_value(&mut self, name: &str) -> Result<Option<Lookup>> {
        if let Some(found) = self.lookup_member_value(name)? {
            return Ok(Some(found));
        }
        Ok(self
            .types
            .resolve(name)?
            .map(|descriptor| Lookup::Typed(descriptor.qualified_name.clone())))
    }

    fn lookup_member_value(&mut self, name: &str) -> Result<Option<Lookup>> {
        if let Some(binding) = self.scopes.lookup(name) {
            return Ok(Some(match &binding.ty {
                Some(ty) => Lookup::Typed(ty.clone()),
                None => Lookup::Untyped,
            }));
        }
        for receiver in self.receiver_chain() {
            if let Some(ty) = self.property_type(&receiver, name)? {
                return Ok(Some(Lookup::Typed(ty)));
            }
        }
        Ok(None)
    }

    /// Lambda receivers innermost first, then the script's receivers
    fn receiver_chain(&self) -> Vec<String> {
        self.scopes
            .metas()
            .filter_map(|meta| meta.receiver.clone())
            .chain(self.script.receivers().map(|d| d.qualified_name.clone()))
            .collect()
    }

    fn this_type(&self) -> Option<String> {
        self.receiver_chain().into_iter().next()
    }

    fn property_type(&self, owner: &str, name: &str) -> Result<Option<String>> {
        let descriptor = match self.resolver.resolve_member(owner, name)? {
            Resolution::Resolved(descriptor) => descriptor,
            Resolution::Unresolved => return Ok(None),
        };
        let getters: Vec<String> = accessor_names(name).into_iter().take(2).collect();
        Ok(descriptor
            .members
            .iter()
            .find(|m| match m.kind {
                MemberKind::Field => m.name == name,
                MemberKind::Method => m.arity() == 0 && getters.contains(&m.name),
                MemberKind::Constructor => false,
            })
            .map(|m| kotlin_type_name(&m.return_type)))
    }

    fn method(&self, owner: &str, name: &str, arity: usize) -> Result<Option<MemberSignature>> {
        let descriptor = match self.resolver.resolve_member(owner, name)? {
            Resolution::Resolved(descriptor) => descriptor,
            Resolution::Unresolved => return Ok(None),
        };
        let methods: Vec<&MemberSignature> = descriptor
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Method && m.name == name)
            .collect();
        Ok(methods
            .iter()
            .find(|m| m.arity() == arity)
            .or_else(|| methods.first())
            .map(|m| (*m).clone()))
    }

    // ── Calls ────────────────────────────────────────────────────────────

    fn visit_call(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        let arity = call_arity(node);
        let callee = match first_named(node) {
            Some(index) => index,
            None => return self.visit_children(node).map(|_| None),
        };

        let outcome = {
            let callee = &mut node.children_mut()[callee];
            match callee.kind() {
                LstKind::Identifier => {
                    let name = callee.text().trim_matches('`').to_string();
                    match self.resolve_simple_call(&name, arity)? {
                        Some(target) => CallOutcome::Resolved(target),
                        None => CallOutcome::Missing(name),
                    }
                }
                LstKind::Navigation => self.resolve_receiver_call(callee, arity)?,
                _ => {
                    self.visit(callee)?;
                    CallOutcome::Cascaded(callee.text())
                }
            }
        };

        let (return_type, signature) = match outcome {
            CallOutcome::Resolved(target) => {
                let return_type = self.apply_target(node, &target);
                (return_type, target.signature)
            }
            CallOutcome::Missing(name) => {
                self.set_unresolved(node, &name, true);
                (None, None)
            }
            CallOutcome::Cascaded(name) => {
                self.set_unresolved(node, &name, false);
                (None, None)
            }
        };

        let (receiver, parameters) = lambda_shape(signature.as_ref());
        for child in node.children_mut().iter_mut().skip(callee + 1) {
            if child.kind() == &LstKind::CallSuffix {
                self.visit_call_suffix(child, receiver.clone(), &parameters)?;
            } else if child.kind() != &LstKind::Token {
                self.visit(child)?;
            }
        }
        Ok(return_type)
    }

    fn visit_call_suffix(
        &mut self,
        suffix: &mut TreeNode,
        receiver: Option<String>,
        parameters: &[Option<String>],
    ) -> Result<()> {
        for child in suffix.children_mut() {
            match child.kind() {
                LstKind::AnnotatedLambda => {
                    for part in child.children_mut() {
                        if part.kind() == &LstKind::Lambda {
                            self.visit_lambda(part, receiver.clone(), parameters)?;
                        } else {
                            self.visit(part)?;
                        }
                    }
                }
                LstKind::Token => {}
                _ => {
                    self.visit(child)?;
                }
            }
        }
        Ok(())
    }

    /// `f(...)`: script functions, lambda receivers, script receivers,
    /// then a constructor
    fn resolve_simple_call(&mut self, name: &str, arity: usize) -> Result<Option<CallTarget>> {
        if let Some(function) = self.local_function(name, arity) {
            let return_type = match &function.return_type {
                Some(written) => self
                    .types
                    .resolve(written)?
                    .map(|d| d.qualified_name.clone())
                    .unwrap_or_else(|| written.clone()),
                None if function.expression_body => KOTLIN_ANY.to_string(),
                None => KOTLIN_UNIT.to_string(),
            };
            // a missing declared type was reported at the declaration
            return Ok(Some(CallTarget {
                type_ref: self.type_ref_of(&return_type)?,
                signature: None,
                report: false,
            }));
        }

        for receiver in self.receiver_chain() {
            if let Some(signature) = self.method(&receiver, name, arity)? {
                return self.member_target(signature).map(Some);
            }
        }

        Ok(self.types.resolve(name)?.map(|descriptor| constructor_target(&descriptor)))
    }

    fn local_function(&self, name: &str, arity: usize) -> Option<LocalFunction> {
        let overloads = self.functions.get(name)?;
        overloads
            .iter()
            .find(|f| f.arity == arity)
            .or_else(|| overloads.first())
            .cloned()
    }

    /// `a.f(...)`: a qualified constructor, or member `f` of the type of `a`
    fn resolve_receiver_call(&mut self, callee: &mut TreeNode, arity: usize) -> Result<CallOutcome> {
        let member = match callee.child(&LstKind::NavigationSuffix).and_then(suffix_member) {
            Some(member) => member,
            None => {
                self.visit(callee)?;
                return Ok(CallOutcome::Cascaded(callee.text()));
            }
        };

        if let Some(descriptor) = self.class_reference(callee)? {
            let target = constructor_target(&descriptor);
            callee.set_type_ref(Some(target.type_ref.clone()));
            return Ok(CallOutcome::Resolved(target));
        }

        let owner = match first_named(callee) {
            Some(index) => self.visit_receiver(&mut callee.children_mut()[index])?,
            None => None,
        };
        let owner = match owner {
            Some(owner) => owner,
            None => {
                self.set_unresolved(callee, &member, false);
                return Ok(CallOutcome::Cascaded(member));
            }
        };

        match self.method(&owner, &member, arity)? {
            Some(signature) => {
                let target = self.member_target(signature)?;
                callee.set_type_ref(Some(target.type_ref.clone()));
                Ok(CallOutcome::Resolved(target))
            }
            None => {
                self.set_unresolved(callee, &member, false);
                Ok(CallOutcome::Missing(member))
            }
        }
    }

    fn member_target(&self, signature: MemberSignature) -> Result<CallTarget> {
        let return_type = kotlin_type_name(&signature.return_type);
        Ok(CallTarget {
            type_ref: self.type_ref_of(&return_type)?,
            signature: Some(signature),
            report: true,
        })
    }

    /// Stamp a call's result type. Returns it when resolved.
    fn apply_target(&mut self, node: &mut TreeNode, target: &CallTarget) -> Option<String> {
        match &target.type_ref {
            TypeRef::Unresolved { name } => {
                let name = name.clone();
                self.set_unresolved(node, &name, target.report);
                None
            }
            resolved => {
                node.set_type_ref(Some(resolved.clone()));
                resolved.qualified_name().map(str::to_string)
            }
        }
    }

    fn visit_lambda(
        &mut self,
        lambda: &mut TreeNode,
        receiver: Option<String>,
        parameters: &[Option<String>],
    ) -> Result<()> {
        self.scopes.push(FrameMeta { receiver });
        let result = self.visit_lambda_body(lambda, parameters);
        self.scopes.pop();
        result
    }

    fn visit_lambda_body(&mut self, lambda: &mut TreeNode, parameters: &[Option<String>]) -> Result<()> {
        let parameters = parameters
            .iter()
            .map(|ty| self.known_type(ty.as_deref()))
            .collect::<Result<Vec<_>>>()?;
        let explicit = lambda.child(&LstKind::LambdaParameters).is_some();
        if !explicit && parameters.len() == 1 {
            self.scopes.declare("it", Binding { ty: parameters[0].clone() });
        }

        for child in lambda.children_mut() {
            if child.kind() == &LstKind::LambdaParameters {
                let declarations = child
                    .children_mut()
                    .iter_mut()
                    .filter(|c| c.kind() == &LstKind::VariableDeclaration);
                for (index, declaration) in declarations.enumerate() {
                    let ty = parameters.get(index).cloned().flatten();
                    self.visit_variable(declaration, ty)?;
                }
            } else {
                self.visit(child)?;
            }
        }
        Ok(())
    }

    // ── Member access ────────────────────────────────────────────────────

    fn visit_navigation(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        if let Some(descriptor) = self.class_reference(node)? {
            node.set_type_ref(Some(TypeRef::of(&descriptor)));
            return Ok(Some(descriptor.qualified_name.clone()));
        }

        let member = node.child(&LstKind::NavigationSuffix).and_then(suffix_member);
        let owner = match first_named(node) {
            Some(index) => self.visit_receiver(&mut node.children_mut()[index])?,
            None => None,
        };
        let member = match member {
            Some(member) => member,
            None => {
                let text = node.text();
                self.set_unresolved(node, text.trim(), false);
                return Ok(None);
            }
        };

        let owner = match owner {
            Some(owner) => owner,
            None => {
                self.set_unresolved(node, &member, false);
                return Ok(None);
            }
        };
        match self.property_type(&owner, &member)? {
            Some(ty) => self.set_type(node, &ty, true),
            None => {
                self.set_unresolved(node, &member, true);
                Ok(None)
            }
        }
    }

    /// Type of a receiver expression. A dotted name that is not a value is
    /// tried as a qualified class reference first.
    fn visit_receiver(&mut self, receiver: &mut TreeNode) -> Result<Option<String>> {
        if receiver.kind() == &LstKind::Navigation {
            if let Some(descriptor) = self.class_reference(receiver)? {
                receiver.set_type_ref(Some(TypeRef::of(&descriptor)));
                return Ok(Some(descriptor.qualified_name.clone()));
            }
        }
        self.visit(receiver)
    }

    /// `org.gradle.api.JavaVersion` written out in an expression
    fn class_reference(&mut self, node: &TreeNode) -> Result<Option<std::sync::Arc<TypeDescriptor>>> {
        let chain = match dotted_chain(node) {
            Some(chain) if chain.len() > 1 => chain,
            _ => return Ok(None),
        };
        if self.lookup_member_value(&chain[0])?.is_some() {
            return Ok(None);
        }
        self.types.resolve(&chain.join("."))
    }

    fn visit_infix(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        let named: Vec<usize> = named_indices(node);
        let (left, operator, right) = match named.as_slice() {
            [left, operator, right, ..] => (*left, *operator, *right),
            _ => return self.visit_children(node).map(|_| None),
        };
        let name = node.children()[operator].text();

        let owner = self.visit(&mut node.children_mut()[left])?;
        self.visit(&mut node.children_mut()[right])?;

        let owner = match owner {
            Some(owner) => owner,
            None => {
                self.set_unresolved(node, &name, false);
                return Ok(None);
            }
        };
        match self.method(&owner, &name, 1)? {
            Some(signature) => {
                let target = self.member_target(signature)?;
                Ok(self.apply_target(node, &target))
            }
            None => {
                self.set_unresolved(node, &name, true);
                Ok(None)
            }
        }
    }

    // ── Declarations ─────────────────────────────────────────────────────

    fn visit_property(&mut self, node: &mut TreeNode) -> Result<()> {
        let mut declared = None;
        let mut initializer = None;
        let mut after_assign = false;
        let mut variables = Vec::new();

        for (index, child) in node.children_mut().iter_mut().enumerate() {
            match child.kind() {
                LstKind::VariableDeclaration => {
                    variables.push(index);
                    if let Some(ty) = child.children_mut().iter_mut().find(|c| c.kind() == &LstKind::TypeReference) {
                        declared = self.visit_type_reference(ty)?;
                    }
                }
                LstKind::Token => after_assign = child.token_text() == Some("="),
                LstKind::Identifier => {
                    // initializer that is a bare name
                    let ty = self.visit(child)?;
                    if after_assign {
                        initializer = ty;
                    }
                }
                _ => {
                    let ty = self.visit(child)?;
                    if after_assign {
                        initializer = ty;
                        after_assign = false;
                    }
                }
            }
        }

        let ty = declared.or(initializer);
        let mut name = String::new();
        for index in variables {
            let variable = &mut node.children_mut()[index];
            name = variable
                .child(&LstKind::Identifier)
                .map(TreeNode::text)
                .unwrap_or_default();
            self.type_declaration(variable, &name, ty.as_deref())?;
            self.scopes.declare(name.clone(), Binding { ty: ty.clone() });
        }
        if name.is_empty() {
            // destructuring declaration
            name = node.text();
        }
        self.type_declaration(node, &name, ty.as_deref())
    }

    /// Loop variables and lambda parameters
    fn visit_variable(&mut self, node: &mut TreeNode, known: Option<String>) -> Result<()> {
        let mut declared = None;
        for child in node.children_mut() {
            if child.kind() == &LstKind::TypeReference {
                declared = self.visit_type_reference(child)?;
            }
        }
        let ty = declared.or(known);
        let name = node
            .child(&LstKind::Identifier)
            .map(TreeNode::text)
            .unwrap_or_default();
        self.type_declaration(node, &name, ty.as_deref())?;
        self.scopes.declare(name, Binding { ty });
        Ok(())
    }

    fn visit_parameter(&mut self, node: &mut TreeNode) -> Result<()> {
        let mut ty = None;
        for child in node.children_mut() {
            match child.kind() {
                LstKind::TypeReference => ty = self.visit_type_reference(child)?,
                LstKind::Identifier | LstKind::Token => {}
                _ => {
                    self.visit(child)?;
                }
            }
        }
        let name = node
            .child(&LstKind::Identifier)
            .map(TreeNode::text)
            .unwrap_or_default();
        self.type_declaration(node, &name, ty.as_deref())?;
        self.scopes.declare(name, Binding { ty });
        Ok(())
    }

    fn visit_catch(&mut self, node: &mut TreeNode) -> Result<()> {
        let mut ty = None;
        for child in node.children_mut() {
            match child.kind() {
                LstKind::TypeReference => ty = self.visit_type_reference(child)?,
                LstKind::Identifier | LstKind::Token => {}
                _ => {
                    self.visit(child)?;
                }
            }
        }
        if let Some(name) = node.child(&LstKind::Identifier).map(TreeNode::text) {
            self.scopes.declare(name, Binding { ty });
        }
        Ok(())
    }

    /// Declarations are never reported; their type was reported where it
    /// went missing
    fn type_declaration(&self, node: &mut TreeNode, name: &str, ty: Option<&str>) -> Result<()> {
        let type_ref = match ty {
            Some(ty) => self.type_ref_of(ty)?,
            None => TypeRef::unresolved(name),
        };
        let type_ref = match type_ref {
            TypeRef::Unresolved { .. } => TypeRef::unresolved(name),
            resolved => resolved,
        };
        node.set_type_ref(Some(type_ref));
        Ok(())
    }

    fn visit_type_reference(&mut self, node: &mut TreeNode) -> Result<Option<String>> {
        let name = match type_reference_name(node) {
            Some(name) => name,
            None => {
                node.set_type_ref(None);
                return Ok(None);
            }
        };
        if self.type_parameters.contains(&name) {
            return self.set_type(node, KOTLIN_ANY, true);
        }
        match self.types.resolve(&name)? {
            Some(descriptor) => {
                node.set_type_ref(Some(TypeRef::of(&descriptor)));
                Ok(Some(descriptor.qualified_name.clone()))
            }
            None => {
                self.set_unresolved(node, &name, true);
                Ok(None)
            }
        }
    }

    fn visit_import(&mut self, node: &mut TreeNode) -> Result<()> {
        let qualified = match node.child(&LstKind::Identifier) {
            Some(identifier) => strip_whitespace(&identifier.text()),
            None => return Ok(()),
        };

        if node.children().iter().any(|c| is_other(c.kind(), "wildcard_import")) {
            self.types.add_wildcard(qualified);
            return Ok(());
        }

        let alias = node
            .children()
            .iter()
            .find(|c| is_other(c.kind(), "import_alias"))
            .and_then(|alias| alias.named_children().last())
            .map(|name| name.text());
        let simple = qualified.rsplit('.').next().unwrap_or(&qualified).to_string();
        self.types.add_import(alias.unwrap_or(simple), qualified.clone());

        match self.resolver.resolve(&qualified)? {
            Resolution::Resolved(descriptor) => node.set_type_ref(Some(TypeRef::of(&descriptor))),
            Resolution::Unresolved => self.set_unresolved(node, &qualified, true),
        }
        Ok(())
    }

    // ── Annotations ──────────────────────────────────────────────────────

    /// `Resolved` only when the resolver has the type
    fn type_ref_of(&self, qualified_name: &str) -> Result<TypeRef> {
        Ok(match self.resolver.resolve(qualified_name)? {
            Resolution::Resolved(descriptor) => TypeRef::resolved(qualified_name, descriptor.kind),
            Resolution::Unresolved => TypeRef::unresolved(qualified_name),
        })
    }

    fn known_type(&self, qualified_name: Option<&str>) -> Result<Option<String>> {
        match qualified_name {
            Some(name) => Ok(self.type_ref_of(name)?.qualified_name().map(str::to_string)),
            None => Ok(None),
        }
    }

    /// Stamp `qualified_name` on `node` if the resolver has it; otherwise
    /// mark the node unresolved under that name. Returns the resolved name.
    fn set_type(&mut self, node: &mut TreeNode, qualified_name: &str, report: bool) -> Result<Option<String>> {
        match self.type_ref_of(qualified_name)? {
            TypeRef::Unresolved { .. } => {
                self.set_unresolved(node, qualified_name, report);
                Ok(None)
            }
            resolved => {
                node.set_type_ref(Some(resolved));
                Ok(Some(qualified_name.to_string()))
            }
        }
    }

    fn set_unresolved(&mut self, node: &mut TreeNode, name: &str, report: bool) {
        node.set_type_ref(Some(TypeRef::unresolved(name)));
        if report {
            self.diagnostics.push(Diagnostic::symbol_unresolved(
                self.severity,
                name,
                node.range(),
                node.id(),
            ));
        }
    }
}

fn constructor_target(descriptor: &TypeDescriptor) -> CallTarget {
    CallTarget {
        type_ref: TypeRef::of(descriptor),
        signature: None,
        report: false,
    }
}

/// Receiver and parameter types of a trailing lambda, from the callee's
/// last parameter: `Function1<R, _>` and `Action<R>` give receiver `R`
fn lambda_shape(signature: Option<&MemberSignature>) -> (Option<String>, Vec<Option<String>>) {
    let last = match signature.and_then(|s| s.parameters.last()) {
        Some(last) => last.without_variance(),
        None => return (None, Vec::new()),
    };
    let (name, args) = match last {
        JvmType::Class { name, args } => (name.as_str(), args.as_slice()),
        _ => return (None, Vec::new()),
    };

    if name == ACTION {
        let receiver = args.first().map(kotlin_type_name);
        return (receiver, Vec::new());
    }
    match function_arity(name) {
        Some(arity) => {
            let parameters: Vec<Option<String>> = args
                .iter()
                .take(arity)
                .map(|arg| Some(kotlin_type_name(arg)))
                .collect();
            let receiver = if arity == 1 { parameters.first().cloned().flatten() } else { None };
            (receiver, parameters)
        }
        None => (None, Vec::new()),
    }
}

fn call_arity(call: &TreeNode) -> usize {
    let suffix = match call.child(&LstKind::CallSuffix) {
        Some(suffix) => suffix,
        None => return 0,
    };
    let arguments = suffix
        .child(&LstKind::ValueArguments)
        .map(|args| args.children().iter().filter(|c| c.kind() == &LstKind::ValueArgument).count())
        .unwrap_or(0);
    let lambdas = suffix
        .children()
        .iter()
        .filter(|c| c.kind() == &LstKind::AnnotatedLambda)
        .count();
    arguments + lambdas
}

/// Written name of a type node: `a.b.C` for user types, `FunctionN` for
/// function types. Nullable and parenthesized wrappers are looked through.
fn type_reference_name(node: &TreeNode) -> Option<String> {
    let children = node.children();
    if let Some(params) = children.iter().position(|c| is_other(c.kind(), "function_type_parameters")) {
        let receiver = children[..params].iter().any(|c| c.kind() == &LstKind::TypeReference);
        let arity = children[params].named_children().count() + usize::from(receiver);
        return Some(format!("{}{}", FUNCTION_TYPE_PREFIX, arity));
    }

    let segments: Vec<String> = children
        .iter()
        .filter(|c| is_other(c.kind(), "type_identifier"))
        .map(|c| c.text().trim_matches('`').to_string())
        .collect();
    if !segments.is_empty() {
        return Some(segments.join("."));
    }

    children
        .iter()
        .find(|c| c.kind() == &LstKind::TypeReference)
        .and_then(type_reference_name)
}

/// `a.b.c` as segments when the expression is a plain dotted name
fn dotted_chain(node: &TreeNode) -> Option<Vec<String>> {
    match node.kind() {
        LstKind::Identifier => node.token_text().map(|t| vec![t.trim_matches('`').to_string()]),
        LstKind::Navigation => {
            let suffix = node.child(&LstKind::NavigationSuffix)?;
            if !suffix.children().iter().any(|c| c.token_text() == Some(".")) {
                return None;
            }
            let mut chain = dotted_chain(&node.children()[first_named(node)?])?;
            chain.push(suffix_member(suffix)?);
            Some(chain)
        }
        _ => None,
    }
}

/// Member name of `.name` / `?.name`
fn suffix_member(suffix: &TreeNode) -> Option<String> {
    suffix
        .child(&LstKind::Identifier)
        .map(|identifier| identifier.text().trim_matches('`').to_string())
}

fn first_named(node: &TreeNode) -> Option<usize> {
    node.children().iter().position(|c| c.kind() != &LstKind::Token)
}

fn named_indices(node: &TreeNode) -> Vec<usize> {
    node.children()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind() != &LstKind::Token)
        .map(|(i, _)| i)
        .collect()
}

fn is_other(kind: &LstKind, grammar_name: &str) -> bool {
    matches!(kind, LstKind::Other(name) if name == grammar_name)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whether an identifier at `index` below `parent` is an expression (as
/// opposed to a declaration name, member name or label)
fn identifier_in_expression(parent: &LstKind, children: &[TreeNode], index: usize) -> bool {
    match parent {
        LstKind::VariableDeclaration
        | LstKind::FunctionDeclaration
        | LstKind::ClassDeclaration
        | LstKind::Parameter
        | LstKind::LambdaParameters
        | LstKind::Import
        | LstKind::PackageHeader
        | LstKind::NavigationSuffix
        | LstKind::TypeReference
        | LstKind::Identifier
        | LstKind::Error => false,
        // named argument `name = value`
        LstKind::ValueArgument => children
            .get(index + 1)
            .map(|next| next.token_text() != Some("="))
            .unwrap_or(true),
        LstKind::Other(name) => EXPRESSION_CONTAINERS.contains(&name.as_str()),
        _ => true,
    }
}
