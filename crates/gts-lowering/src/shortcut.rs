//! Lowering of the function-like `define` forms, shared by the runtime and
//! typings passes: shortcut functions, shortcut arguments, query expressions
//! and direct-action bodies.

use crate::builders::NodeFactory;
use crate::state::{TransformState, ids};
use crate::transform::Transform;
use gts_common::Result;
use gts_parser::parser::node::*;
use gts_parser::{NodeIndex, NodeList};

pub trait ShortcutLowering: Transform {
    fn state(&mut self) -> &mut TransformState;

    /// `(__gts_fnArg, { cryo, hydro, ... } = __gts_fnArg[__gts_Prelude])`
    fn shortcut_parameters(&mut self) -> Vec<NodeIndex> {
        let preludes = self.state().options.shortcut_function_preludes.clone();
        let arena = self.arena();
        let fn_arg = arena.identifier(ids::FN_ARG);
        let fn_arg = arena.parameter(fn_arg, NodeIndex::NONE);
        let pattern = arena.object_binding(&preludes);
        let object = arena.identifier(ids::FN_ARG);
        let symbol = arena.identifier(ids::PRELUDE);
        let fallback = arena.element(object, symbol);
        let preludes = arena.parameter(pattern, fallback);
        vec![fn_arg, preludes]
    }

    /// `:( expr )` / `:{ ... }` becomes an arrow over the shortcut parameters.
    fn lower_shortcut_function(
        &mut self,
        idx: NodeIndex,
        shortcut: &GtsShortcutFunctionData,
    ) -> Result<NodeIndex> {
        let body = self.visit(shortcut.body)?;
        let parameters = self.shortcut_parameters();
        Ok(self.arena().derive(
            idx,
            NodeData::ArrowFunction(FunctionData::new(NodeList::from(parameters), body)),
        ))
    }

    /// `:name` becomes `__gts_fnArg.name`. With `keep_range` false the access
    /// itself is unmapped and only the property name keeps its position.
    fn lower_shortcut_argument(
        &mut self,
        idx: NodeIndex,
        argument: &GtsShortcutArgumentData,
        keep_range: bool,
    ) -> Result<NodeIndex> {
        let name = self.visit(argument.property)?;
        let arena = self.arena();
        let object = arena.identifier(ids::FN_ARG);
        let access = NodeData::PropertyAccessExpression(PropertyAccessData {
            expression: object,
            name,
            optional: false,
        });
        Ok(if keep_range {
            arena.derive(idx, access)
        } else {
            arena.add_synthetic(access)
        })
    }

    /// `query* expr` becomes `__gts_query(({ my, opp }) => expr, { star: true })`.
    fn lower_query(&mut self, idx: NodeIndex, query: &GtsQueryData) -> Result<NodeIndex> {
        self.state().has_query_expressions = true;
        let bindings = self.state().options.query_bindings.clone();
        let body = self.visit(query.argument)?;
        let arena = self.arena();
        let pattern = arena.object_binding(&bindings);
        let parameter = arena.parameter(pattern, NodeIndex::NONE);
        let lambda = arena.add_at(
            query.argument,
            NodeData::ArrowFunction(FunctionData::new(NodeList::from(vec![parameter]), body)),
        );
        let star = arena.boolean(query.star);
        let star = arena.property("star", star);
        let options = arena.object(vec![star]);
        let callee = arena.identifier(ids::QUERY);
        Ok(arena.derive(
            idx,
            NodeData::CallExpression(CallData {
                callee,
                type_arguments: None,
                arguments: NodeList::from(vec![lambda, options]),
                optional: false,
            }),
        ))
    }

    /// The block-bodied arrow a direct action's statements run in.
    fn direct_action_function(&mut self, statements: &NodeList) -> Result<NodeIndex> {
        let statements = self.visit_list(statements)?;
        let parameters = self.shortcut_parameters();
        let arena = self.arena();
        let body = arena.block(statements.nodes);
        Ok(arena.arrow(parameters, body))
    }

    /// A direct action becomes one more attribute named by the action symbol:
    /// `() => ({ name: __gts_Action, positionals: () => [(...) => { ... }], named: null })`
    fn lower_direct_function(&mut self, idx: NodeIndex, statements: &NodeList) -> Result<NodeIndex> {
        let function = self.direct_action_function(statements)?;
        let arena = self.arena();
        let action = arena.identifier(ids::ACTION);
        let name = arena.property("name", action);
        let positionals = arena.array(vec![function]);
        let positionals = arena.arrow(Vec::new(), positionals);
        let positionals = arena.property("positionals", positionals);
        let null = arena.null();
        let named = arena.property("named", null);
        let object = arena.object(vec![name, positionals, named]);
        Ok(arena.derive(
            idx,
            NodeData::ArrowFunction(FunctionData::new(NodeList::new(), object)),
        ))
    }
}
