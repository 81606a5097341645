use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use esql::prelude::*;

struct Log;
struct LogSummary;

fn registry() -> Arc<FieldRegistry> {
    let mut registry = FieldRegistry::new(NamingPolicy::Preserve);
    registry.register::<Log>(
        TypeMapping::new()
            .member("message")
            .member("duration")
            .member("status")
            .member("host")
            .member_as("level", "log.level")
            .member_as("timestamp", "@timestamp"),
    );
    registry.register::<LogSummary>(
        TypeMapping::new()
            .member("message")
            .member_as("duration", "took_ms"),
    );
    Arc::new(registry)
}

#[test]
fn test_slow_request_pipeline() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(member("duration").gt(lit(5000)))?
        .sort_desc(member("duration"))?
        .select([
            ("message", member("message")),
            ("duration", member("duration")),
            ("timestamp", member("timestamp")),
        ])?
        .take(50)?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | WHERE duration > 5000\n\
         | SORT duration DESC\n\
         | KEEP message, duration\n\
         | EVAL timestamp = @timestamp\n\
         | LIMIT 50"
    );
    Ok(())
}

#[test]
fn test_count_by_level() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .group_by([("level", keyword("level"))], [("count", count())])?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n| STATS count = COUNT(*) BY level = log.level.keyword"
    );
    Ok(())
}

// Stacked ordering calls compile to separate SORT stages. The engine may
// treat stacked sorts differently from one multi-key clause, so the
// stages are deliberately not merged.
#[test]
fn test_stacked_sorts_are_separate_stages() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .sort_desc(member("timestamp"))?
        .sort(member("host"))?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n| SORT @timestamp DESC\n| SORT host"
    );
    Ok(())
}

// A bare field rename through select() goes out as EVAL, never RENAME;
// RENAME only ever comes from an explicit rename() call.
#[test]
fn test_rename_strategies() -> EsqlResult<()> {
    let projected = Esql::<Log>::from(&registry(), "logs-*")?
        .select([("took", member("duration"))])?;
    assert_eq!(projected.render(), "FROM logs-*\n| EVAL took = duration");

    let renamed = Esql::<Log>::from(&registry(), "logs-*")?
        .rename([("duration", "took")])?;
    assert_eq!(renamed.render(), "FROM logs-*\n| RENAME duration AS took");
    Ok(())
}

#[test]
fn test_parameters_travel_out_of_band() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(member("status").gte(param("threshold", 500)))?
        .filter(member("host").eq(param("host", "web-1")))?
        .filter(member("status").lt(param("threshold", 600)))?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | WHERE status >= ?threshold\n\
         | WHERE host == ?host\n\
         | WHERE status < ?threshold_2"
    );
    assert_eq!(
        query.params().to_wire(),
        json!([{"threshold": 500}, {"host": "web-1"}, {"threshold_2": 600}])
    );
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(member("level").eq(text("error")).or(member("status").gte(lit(500))))?
        .group_by(
            [("host", member("host"))],
            [("errors", count()), ("p95", percentile(member("duration"), 95.0))],
        )?
        .sort_desc(member("errors"))?
        .take(20)?;

    let first = query.render();
    let second = query.render();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "FROM logs-*\n\
         | WHERE log.level == \"error\" OR status >= 500\n\
         | STATS errors = COUNT(*), p95 = PERCENTILE(duration, 95) BY host\n\
         | SORT errors DESC\n\
         | LIMIT 20"
    );
    Ok(())
}

#[test]
fn test_relative_time_window() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(
            member("timestamp")
                .gte(ago(15, TimeUnit::Minute))
                .and(member("timestamp").lt(now())),
        )?
        .filter(member("timestamp").gte(start_of_day()))?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | WHERE @timestamp >= NOW() - 15 minutes AND @timestamp < NOW()\n\
         | WHERE @timestamp >= DATE_TRUNC(1 day, NOW())"
    );
    Ok(())
}

#[test]
fn test_mixed_logical_grouping() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?.filter(
        member("level")
            .eq(text("error"))
            .and(member("status").gte(lit(500)))
            .or(member("duration").gt(lit(10000))),
    )?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n| WHERE (log.level == \"error\" AND status >= 500) OR duration > 10000"
    );
    Ok(())
}

#[test]
fn test_row_pipeline() -> EsqlResult<()> {
    let query = Esql::<()>::row(&registry(), [("x", 1i64), ("y", 2i64)])?
        .eval("total", member("x").add(member("y")))?
        .keep(["total"])?;

    assert_eq!(
        query.render(),
        "ROW x = 1, y = 2\n| EVAL total = x + y\n| KEEP total"
    );
    Ok(())
}

#[test]
fn test_lookup_join_pipeline() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .lookup_join("hosts", member("host").eq(field("host.name")))?
        .keep(["message", "host"])?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | LOOKUP JOIN hosts ON host == host.name\n\
         | KEEP message, host"
    );
    Ok(())
}

#[test]
fn test_select_into_summary_type() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(member("duration").gt(lit(1000)))?
        .select_into::<LogSummary>()?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | WHERE duration > 1000\n\
         | KEEP message\n\
         | EVAL took_ms = duration"
    );
    Ok(())
}

#[test]
fn test_snake_case_policy_applies() -> EsqlResult<()> {
    struct Event;
    let mut registry = FieldRegistry::new(NamingPolicy::SnakeCase);
    registry.register::<Event>(TypeMapping::new().member("requestCount").member("hostName"));
    let registry = Arc::new(registry);

    let query = Esql::<Event>::from(&registry, "events-*")?
        .filter(member("requestCount").gt(lit(100)))?
        .select([("hostName", member("hostName"))])?;

    assert_eq!(
        query.render(),
        "FROM events-*\n\
         | WHERE request_count > 100\n\
         | KEEP host_name"
    );
    Ok(())
}

#[test]
fn test_unknown_member_fails_with_suggestion() {
    let err = Esql::<Log>::from(&registry(), "logs-*")
        .unwrap()
        .filter(member("durtion").gt(lit(5000)))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Field 'durtion' not found on type 'pipeline_test::Log'. Did you mean 'duration'?"
    );
}

#[test]
fn test_full_observability_pipeline() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-2024-*")?
        .filter(member("timestamp").gte(ago(1, TimeUnit::Hour)))?
        .filter(member("level").in_list(["error", "fatal"]).or(member("status").gte(lit(500))))?
        .eval("took", member("duration").div(lit(1000)))?
        .group_by(
            [
                ("level", keyword("level")),
                ("bucket", bucket_span(member("timestamp"), 5, TimeUnit::Minute)),
            ],
            [
                ("count", count()),
                ("slowest", max(member("took"))),
                ("hosts", count_distinct(member("host"))),
            ],
        )?
        .sort_desc(member("count"))?
        .take(100)?;

    assert_eq!(
        query.render(),
        "FROM logs-2024-*\n\
         | WHERE @timestamp >= NOW() - 1 hour\n\
         | WHERE log.level IN (\"error\", \"fatal\") OR status >= 500\n\
         | EVAL took = duration / 1000\n\
         | STATS count = COUNT(*), slowest = MAX(took), hosts = COUNT_DISTINCT(host) BY level = log.level.keyword, bucket = BUCKET(@timestamp, 5 minutes)\n\
         | SORT count DESC\n\
         | LIMIT 100"
    );
    Ok(())
}

#[test]
fn test_completion_pipeline() -> EsqlResult<()> {
    let query = Esql::<Log>::from(&registry(), "logs-*")?
        .filter(member("level").eq(text("error")))?
        .eval("prompt", concat([text("Summarize: "), member("message")]))?
        .completion_as("summary", member("prompt"), "my-elser")?
        .keep(["summary"])?
        .take(1)?;

    assert_eq!(
        query.render(),
        "FROM logs-*\n\
         | WHERE log.level == \"error\"\n\
         | EVAL prompt = CONCAT(\"Summarize: \", message)\n\
         | COMPLETION summary = prompt WITH { \"inference_id\" : \"my-elser\" }\n\
         | KEEP summary\n\
         | LIMIT 1"
    );
    Ok(())
}
