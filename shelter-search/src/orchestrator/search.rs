//! Core search orchestrator: route, gate, fan out, normalize, sort, explain.
//!
//! Routes the query, filters the planned lookups through the permission
//! gate, queries the permitted sources concurrently, tags and keys every
//! record, sorts the merged set and renders the localized explanation.

use std::time::Instant;

use crate::clock::Clock;
use crate::config::{SearchConfig, SearchContext};
use crate::error::SearchError;
use crate::locale::Translator;
use crate::permission::{Capability, PermissionGate, PermissionService};
use crate::query::{parse_query, Dispatch, ParsedQuery, SpecialSearch};
use crate::session::Session;
use crate::source::{FindRequest, PersonClass, RecordSource, ScopeFilters, SourceQuery};
use crate::types::{ResultType, SearchOutcome, SearchResult};

use super::normalize::{normalize_results, Ranking};
use super::sorter::sort_results;

/// The external collaborators one search call talks to.
#[derive(Clone, Copy)]
pub struct SearchServices<'a> {
    pub source: &'a dyn RecordSource,
    pub permissions: &'a dyn PermissionService,
    pub translator: &'a dyn Translator,
    pub clock: &'a dyn Clock,
}

/// Run one search end to end.
///
/// # Pipeline
///
/// 1. Start the timer and parse the query into a dispatch decision
/// 2. Plan one [`FindRequest`] per candidate source; drop those whose view
///    capability is denied
/// 3. Query the remaining sources concurrently with
///    [`futures::future::join_all`], which keeps dispatch order
/// 4. Tag and key every record ([`normalize_results`])
/// 5. Stable-sort the merged set by `SORTON`
/// 6. Stop the timer, translate the explanation and sort label
///
/// # Errors
///
/// Only collaborator failures: the first failing source in dispatch order,
/// a failing permission check, or a failing translation. Denied sources and
/// empty results are not errors.
pub async fn orchestrate_search(
    context: &SearchContext,
    session: &Session,
    query: &str,
    services: &SearchServices<'_>,
) -> Result<SearchOutcome, SearchError> {
    let started = Instant::now();
    let config = &context.config;

    // 1. Route.
    let parsed = parse_query(query, config.default_sort);
    tracing::trace!(query, term = %parsed.term, dispatch = ?parsed.dispatch, "parsed search query");

    // 2. Plan and gate.
    let mut gate = PermissionGate::new(services.permissions, session);
    let requests = plan_requests(&parsed, session, config, &mut gate)?;

    // 3. Fan out.
    let outcomes =
        futures::future::join_all(requests.iter().map(|request| services.source.find(request)))
            .await;

    // 4. Normalize in dispatch order.
    let term = parsed.term.to_lowercase();
    let ranking = Ranking {
        mode: parsed.sort_mode,
        term: &term,
        now: services.clock.now(),
        limit: config.record_search_limit,
    };
    let mut results: Vec<SearchResult> = Vec::new();
    for (request, outcome) in requests.iter().zip(outcomes) {
        let records = outcome?;
        let result_type = request.query.result_type();
        tracing::debug!(%result_type, count = records.len(), "source returned records");
        results.extend(normalize_results(records, result_type, &ranking));
    }

    // 5. Sort.
    sort_results(&mut results, parsed.sort_mode.direction());

    // 6. Explain.
    let elapsed = started.elapsed();
    let explain = explain(&parsed, context, services.translator)?;
    let sort_label =
        services
            .translator
            .translate(parsed.sort_mode.label(), &context.locale, &[])?;

    tracing::debug!(
        count = results.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "search complete"
    );

    Ok(SearchOutcome {
        results,
        elapsed,
        explain,
        sort_label,
    })
}

/// The lookups a parsed query runs, before permission gating.
pub fn planned_lookups(parsed: &ParsedQuery) -> Vec<(SourceQuery, Option<PersonClass>)> {
    match parsed.dispatch {
        Dispatch::Special(special) => vec![(special.source_query(), special.class_filter())],
        Dispatch::Scoped(scope) => vec![(SourceQuery::find_for(scope), None)],
        Dispatch::Everything => ResultType::all()
            .iter()
            .map(|result_type| (SourceQuery::find_for(*result_type), None))
            .collect(),
    }
}

fn plan_requests(
    parsed: &ParsedQuery,
    session: &Session,
    config: &SearchConfig,
    gate: &mut PermissionGate<'_>,
) -> Result<Vec<FindRequest>, SearchError> {
    let mut requests = Vec::new();
    for (query, class_filter) in planned_lookups(parsed) {
        if !gate.allows(query.capability())? {
            continue;
        }
        let filters = scope_filters(query.result_type(), class_filter, session, gate)?;
        requests.push(FindRequest {
            query,
            term: parsed.term.clone(),
            limit: config.record_search_limit,
            filters,
        });
    }
    Ok(requests)
}

fn scope_filters(
    result_type: ResultType,
    class_filter: Option<PersonClass>,
    session: &Session,
    gate: &mut PermissionGate<'_>,
) -> Result<ScopeFilters, SearchError> {
    let mut filters = ScopeFilters {
        site_id: session.site_id,
        ..Default::default()
    };
    match result_type {
        ResultType::Animal => {
            filters.location_filter = session.location_filter.clone();
            filters.visible_animal_ids = session.visible_animal_ids.clone();
        }
        ResultType::Person => {
            filters.user = Some(session.user.clone());
            filters.class_filter = class_filter;
            filters.include_staff = gate.allows(Capability::ViewStaff)?;
            filters.include_volunteers = gate.allows(Capability::ViewVolunteer)?;
        }
        ResultType::AnimalControl => {
            filters.user = Some(session.user.clone());
        }
        ResultType::WaitingList
        | ResultType::LostAnimal
        | ResultType::FoundAnimal
        | ResultType::Licence => {}
    }
    Ok(filters)
}

fn explain(
    parsed: &ParsedQuery,
    context: &SearchContext,
    translator: &dyn Translator,
) -> Result<String, SearchError> {
    let months = context.config.long_term_months.to_string();
    let args: Vec<&str> = match parsed.dispatch {
        Dispatch::Special(SpecialSearch::LongTerm) => vec![months.as_str()],
        Dispatch::Special(_) => vec![],
        Dispatch::Scoped(_) | Dispatch::Everything => vec![parsed.term.as_str()],
    };
    translator.translate(parsed.explanation(), &context.locale, &args)
}
