//! Renders criterion trees and where/having clauses.

use tracing::{debug, trace};

use crate::{
    ast::criterion::{Connector, CriterionKind, SqlCriterion, WhereModel},
    error::{DynSqlError, Result},
    renderer::{
        ParameterSequence, RenderedStatement, RenderingContext,
        condition::render_column_and_condition,
        fragment::{FragmentAndParameters, FragmentCollector},
        select::render_select_model,
        strategy::RenderingStrategy,
    },
};

struct RenderedCriterion {
    connector: Option<Connector>,
    fragment: FragmentAndParameters,
}

/// Renders one criterion and its children, or `None` if nothing renders.
///
/// A leaf whose condition does not render is dropped together with its
/// children. The result is parenthesized when more than one piece renders.
pub(crate) fn render_criterion(
    criterion: &SqlCriterion,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    let initial = render_initial(criterion.kind(), ctx)?;
    if initial.is_none() && criterion.is_leaf() {
        trace!("Skipping non-rendering criterion and its children");
        return Ok(None);
    }

    let mut pieces = Vec::with_capacity(criterion.sub_criteria().len() + 1);
    if let Some(fragment) = initial {
        pieces.push(RenderedCriterion {
            connector: None,
            fragment,
        });
    }
    for group in criterion.sub_criteria() {
        if let Some(fragment) = render_criterion(group.initial_criterion(), ctx)? {
            pieces.push(RenderedCriterion {
                connector: Some(group.connector()),
                fragment,
            });
        }
    }
    Ok(fold(pieces, true))
}

fn render_initial(
    kind: &CriterionKind,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    match kind {
        CriterionKind::ColumnAndCondition { column, condition } => {
            render_column_and_condition(column, condition, ctx)
        }
        CriterionKind::Exists { select, negated } => {
            let keyword = if *negated { "not exists" } else { "exists" };
            let sub = render_select_model(select, ctx)?;
            Ok(Some(sub.map_fragment(|text| format!("{keyword} ({text})"))))
        }
        CriterionKind::Group(inner) => render_criterion(inner, ctx),
        CriterionKind::Not(inner) => Ok(render_criterion(inner, ctx)?
            .map(|fragment| fragment.map_fragment(|text| format!("not {text}")))),
    }
}

/// Joins pieces with their connectors. The first piece never carries its
/// connector, so suppressed siblings cannot leave one dangling.
fn fold(pieces: Vec<RenderedCriterion>, parenthesize: bool) -> Option<FragmentAndParameters> {
    if pieces.len() <= 1 {
        return pieces.into_iter().next().map(|piece| piece.fragment);
    }

    let mut collector = FragmentCollector::new();
    for (i, piece) in pieces.into_iter().enumerate() {
        match piece.connector {
            Some(connector) if i > 0 => collector.add(
                piece
                    .fragment
                    .map_fragment(|text| format!("{} {text}", connector.as_str())),
            ),
            _ => collector.add(piece.fragment),
        }
    }
    Some(if parenthesize {
        collector.to_fragment_and_parameters_with(" ", "(", ")")
    } else {
        collector.to_fragment_and_parameters(" ")
    })
}

/// Renders `where ...` (or `having ...`); the top level is never
/// parenthesized.
///
/// Returns `None` when every criterion is suppressed and the model allows
/// that, otherwise fails with [`DynSqlError::NonRenderingClause`].
pub(crate) fn render_where_clause(
    model: &WhereModel,
    keyword: &'static str,
    ctx: &RenderingContext<'_>,
) -> Result<Option<FragmentAndParameters>> {
    let mut pieces = Vec::with_capacity(model.sub_criteria().len() + 1);
    if let Some(initial) = model.initial_criterion()
        && let Some(fragment) = render_criterion(initial, ctx)?
    {
        pieces.push(RenderedCriterion {
            connector: None,
            fragment,
        });
    }
    for group in model.sub_criteria() {
        if let Some(fragment) = render_criterion(group.initial_criterion(), ctx)? {
            pieces.push(RenderedCriterion {
                connector: Some(group.connector()),
                fragment,
            });
        }
    }

    match fold(pieces, false) {
        Some(clause) => Ok(Some(clause.map_fragment(|text| format!("{keyword} {text}")))),
        None if model.is_non_rendering_allowed() => Ok(None),
        None => Err(DynSqlError::NonRenderingClause { clause: keyword }),
    }
}

impl WhereModel {
    /// Renders `where ...` on its own, for splicing into a statement written
    /// elsewhere. Placeholders are scoped under `parameter_name` when given,
    /// e.g. `#{record.parameters.p1}`.
    ///
    /// Returns `None` when every criterion was suppressed and the model
    /// allows that.
    pub fn render(
        &self,
        strategy: &dyn RenderingStrategy,
        parameter_name: Option<&str>,
    ) -> Result<Option<RenderedStatement>> {
        let sequence = ParameterSequence::new();
        let ctx = RenderingContext::new(&sequence, strategy);
        let ctx = match parameter_name {
            Some(name) => ctx.with_parameter_name(name),
            None => ctx,
        };

        let rendered = render_where_clause(self, "where", &ctx)?.map(RenderedStatement::from_fragment);
        if let Some(rendered) = &rendered {
            debug!(
                "Rendered standalone where clause with {} parameters: {}",
                rendered.parameters().len(),
                rendered.sql()
            );
        }
        Ok(rendered)
    }
}
