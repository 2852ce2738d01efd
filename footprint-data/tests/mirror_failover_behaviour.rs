//! Behavioural tests for [`MirrorFetcher`] failover.
//!
//! These tests use [`ScriptedTransport`] to verify ordering without contacting
//! live Overpass mirrors.

use footprint_data::overpass::test_support::ScriptedTransport;
use footprint_data::overpass::{
    FetchError, FetchedResponse, MirrorAttemptError, MirrorEndpoint, MirrorFetcher, OverpassQuery,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

mod support;

const MIRRORS: [&str; 3] = [
    "https://mirror-a.example/api/interpreter",
    "https://mirror-b.example/api/interpreter",
    "https://mirror-c.example/api/interpreter",
];

type FetchCell = RefCell<Option<Result<FetchedResponse, FetchError>>>;

#[fixture]
fn transport() -> RefCell<ScriptedTransport> {
    RefCell::new(ScriptedTransport::new())
}

#[fixture]
fn fetcher() -> RefCell<MirrorFetcher> {
    RefCell::new(MirrorFetcher::new(Vec::new()))
}

#[fixture]
fn result() -> FetchCell {
    RefCell::new(None)
}

fn script(
    transport: &RefCell<ScriptedTransport>,
    edit: impl FnOnce(ScriptedTransport) -> ScriptedTransport,
) {
    let current = std::mem::take(&mut *transport.borrow_mut());
    *transport.borrow_mut() = edit(current);
}

// --- Given steps ---

#[given("three Overpass mirrors")]
fn three_mirrors(#[from(fetcher)] fetcher: &RefCell<MirrorFetcher>) {
    let mirrors = MIRRORS
        .iter()
        .map(|url| MirrorEndpoint::parse(url).expect("valid mirror url"))
        .collect();
    *fetcher.borrow_mut() = MirrorFetcher::new(mirrors);
}

#[given("the first mirror times out")]
fn first_times_out(#[from(transport)] transport: &RefCell<ScriptedTransport>) {
    script(transport, |scripted| scripted.with_timeout(MIRRORS[0]));
}

#[given("the second mirror returns buildings")]
fn second_returns_buildings(#[from(transport)] transport: &RefCell<ScriptedTransport>) {
    script(transport, |scripted| {
        scripted.with_json(MIRRORS[1], support::fixture("bristol_two_ways"))
    });
}

#[given("every mirror fails")]
fn every_mirror_fails(#[from(transport)] transport: &RefCell<ScriptedTransport>) {
    script(transport, |scripted| {
        scripted
            .with_status(MIRRORS[0], 504)
            .with_timeout(MIRRORS[1])
            .with_json(MIRRORS[2], "<html>Too Many Requests</html>")
    });
}

// --- When steps ---

#[when("the buildings query is fetched")]
fn fetch_query(
    #[from(transport)] transport: &RefCell<ScriptedTransport>,
    #[from(fetcher)] fetcher: &RefCell<MirrorFetcher>,
    #[from(result)] result: &FetchCell,
) {
    let query = OverpassQuery::buildings(&support::bristol_bounds());
    let outcome = fetcher.borrow().fetch(&*transport.borrow(), &query);
    *result.borrow_mut() = Some(outcome);
}

// --- Then steps ---

#[then("the second mirror serves the response")]
fn second_serves(#[from(result)] result: &FetchCell) {
    let borrowed = result.borrow();
    let fetched = borrowed
        .as_ref()
        .expect("fetch should have run")
        .as_ref()
        .expect("expected a successful fetch");
    assert_eq!(fetched.endpoint.url(), MIRRORS[1]);
    assert_eq!(fetched.response.elements.len(), 2);
    assert!(
        matches!(
            fetched.failed_attempts.as_slice(),
            [MirrorAttemptError::Timeout { .. }]
        ),
        "expected one timeout, got {:?}",
        fetched.failed_attempts
    );
}

#[then("the third mirror is never contacted")]
fn third_untouched(#[from(transport)] transport: &RefCell<ScriptedTransport>) {
    let contacted = transport.borrow().contacted();
    assert_eq!(contacted, vec![MIRRORS[0].to_owned(), MIRRORS[1].to_owned()]);
}

#[then("the fetch reports exhausted mirrors")]
fn fetch_exhausted(#[from(result)] result: &FetchCell) {
    let borrowed = result.borrow();
    let err = borrowed
        .as_ref()
        .expect("fetch should have run")
        .as_ref()
        .expect_err("expected the fetch to fail");
    assert!(
        matches!(
            err.attempts(),
            [
                MirrorAttemptError::HttpStatus { status: 504, .. },
                MirrorAttemptError::Timeout { .. },
                MirrorAttemptError::Decode { .. }
            ]
        ),
        "unexpected attempts: {err:?}"
    );
}

#[then("every mirror was contacted once in order")]
fn contacted_in_order(#[from(transport)] transport: &RefCell<ScriptedTransport>) {
    let expected: Vec<String> = MIRRORS.iter().map(|url| (*url).to_owned()).collect();
    assert_eq!(transport.borrow().contacted(), expected);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/mirror_failover.feature", name = $title)]
        fn $fn_name(
            transport: RefCell<ScriptedTransport>,
            fetcher: RefCell<MirrorFetcher>,
            result: FetchCell,
        ) {
            let _ = (transport, fetcher, result);
        }
    };
}

register_scenario!(
    falling_back_past_timeout,
    "falling back past a timed-out mirror"
);
register_scenario!(exhausting_every_mirror, "exhausting every mirror");
