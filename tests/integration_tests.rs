//! Integration tests for building and rendering templates

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use interpolated_text::{
    format_source, Arg, Argument, CustomValue, FormatError, FormatProvider, FormatSource,
    Fragment, ParseError, Template, TemplateOptions, Value,
};

fn options() -> TemplateOptions {
    TemplateOptions::default()
}

fn parse(source: FormatSource) -> Template {
    Template::parse_with_options(source, options()).expect("Should parse")
}

#[test]
fn test_build_query_incrementally() {
    let name = Some("ann");
    let min_age: Option<i32> = None;

    let mut query = Template::with_options(options());
    query.append_literal("SELECT id, name FROM users WHERE 1=1");
    query
        .append_source_if(name.is_some(), format_source!(" AND name = {0}", name))
        .unwrap()
        .append_source_if(min_age.is_some(), format_source!(" AND age >= {0}", min_age))
        .unwrap()
        .append_source(format_source!(" ORDER BY {0:raw} LIMIT {1}", "name", 10))
        .unwrap();

    assert_snapshot!(
        query.format(),
        @"SELECT id, name FROM users WHERE 1=1 AND name = {0} ORDER BY name LIMIT {1}"
    );
    assert_snapshot!(
        query.bind_placeholders(|i| format!("@p{i}")).unwrap(),
        @"SELECT id, name FROM users WHERE 1=1 AND name = @p0 ORDER BY name LIMIT @p1"
    );
    let values: Vec<&Value> = query.values().collect();
    assert_eq!(values, vec![&Value::from("ann"), &Value::from(10)]);
}

#[test]
fn test_compose_nested_filters() {
    let by_city = parse(format_source!("city = {0}", "Oslo"));
    let by_age = parse(format_source!("age BETWEEN {0} AND {1}", 20, 30));
    let filter = parse(format_source!("({0}) OR ({1})", by_city, by_age));

    let query = parse(format_source!(
        "SELECT * FROM people WHERE {0} AND active = {1}",
        filter,
        true
    ));

    assert_eq!(
        query.format(),
        "SELECT * FROM people WHERE (city = {0}) OR (age BETWEEN {1} AND {2}) AND active = {3}"
    );
    assert_snapshot!(
        query.render().unwrap(),
        @"SELECT * FROM people WHERE (city = Oslo) OR (age BETWEEN 20 AND 30) AND active = true"
    );
}

#[test]
fn test_fill_in_marker() {
    let mut page = Template::parse_with_options(
        FormatSource::new(
            "
            <h1>{0}</h1>
            <ul>
            ITEMS
            </ul>",
            vec![Arg::from("Groceries")],
        ),
        options().with_auto_adjust_multiline(true),
    )
    .unwrap();

    let mut items = Template::with_options(options());
    for (i, item) in ["milk", "eggs"].iter().enumerate() {
        if i > 0 {
            items.append_literal("\n");
        }
        items.append_source(format_source!("<li>{0}</li>", *item)).unwrap();
    }

    assert!(page.replace("ITEMS", items));
    assert!(!page.replace("ITEMS", parse(format_source!("again"))));
    assert_eq!(page.argument_count(), 3);
    assert_eq!(
        page.render().unwrap(),
        "<h1>Groceries</h1>\n<ul>\n<li>milk</li>\n<li>eggs</li>\n</ul>"
    );
}

#[test]
fn test_dedup_across_merges() {
    let reuse = options().with_reuse_identical_arguments(true);
    let mut query = Template::parse_with_options(
        format_source!("a = {0} OR b = {0:D2} OR c = {1}", 5, 5),
        reuse.clone(),
    )
    .unwrap();
    assert_eq!(query.format(), "a = {0} OR b = {1:D2} OR c = {0}");

    query.append(parse(format_source!(" OR d = {0} OR e = {1}", 5, 6)));
    assert_eq!(
        query.format(),
        "a = {0} OR b = {1:D2} OR c = {0} OR d = {0} OR e = {2}"
    );
    assert_eq!(query.argument_count(), 3);
    assert_snapshot!(query.render().unwrap(), @"a = 5 OR b = 05 OR c = 5 OR d = 5 OR e = 6");
}

#[test]
fn test_fragments_fast_path() {
    let user = parse(format_source!("{0}", "bob"));
    let t = Template::parse_with_options(
        vec![
            Fragment::literal("user "),
            Fragment::argument(user, None),
            Fragment::literal(" has {"),
            Fragment::argument(3, Some("D2")),
            Fragment::literal("} items"),
        ],
        options(),
    )
    .unwrap();

    assert_eq!(t.format(), "user {0} has {{{1:D2}}} items");
    assert_eq!(t.render().unwrap(), "user bob has {03} items");
}

#[test]
fn test_parse_error_report() {
    let err = Template::parse_with_options(format_source!("x = {0}, y = {1}", 1), options())
        .unwrap_err();
    assert_eq!(err, ParseError::argument_index(1, 1, 13..16));
    assert_eq!(
        err.to_string(),
        "placeholder {1} at 13..16 refers to a missing argument (1 supplied)"
    );

    let report = err.format("x = {0}, y = {1}", "query.sql");
    assert!(report.contains("argument index 1 is out of range"));
    assert!(report.contains("only argument 0 exists"));
    assert!(report.contains("query.sql"));
}

#[test]
fn test_from_parts_round_trip() {
    let original = parse(format_source!("{0:X} and {1}", 255, "z"));
    let (format, arguments) = original.clone().into_parts();
    let rebuilt = Template::from_parts(format, arguments, options()).unwrap();
    assert_eq!(rebuilt, original);
    assert_eq!(rebuilt.render().unwrap(), "FF and z");
}

#[test]
fn test_from_parts_keeps_out_of_order_placeholders() {
    let t = Template::from_parts(
        "{1} {0} {1}",
        vec![Argument::new("a", None), Argument::new("b", None)],
        options(),
    )
    .unwrap();
    assert_eq!(t.render().unwrap(), "b a b");
}

#[derive(Debug, Clone, PartialEq)]
struct Temperature(f64);

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl CustomValue for Temperature {
    fn type_name(&self) -> &'static str {
        "temperature"
    }

    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        other
            .as_any()
            .downcast_ref::<Temperature>()
            .is_some_and(|o| o == self)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn format(&self, spec: Option<&str>, provider: &dyn FormatProvider) -> Result<String, FormatError> {
        let number = provider.format(&Value::Float(self.0), spec)?;
        Ok(format!("{number}°C"))
    }
}

#[test]
fn test_custom_values_format_and_dedup() {
    let reuse = options().with_reuse_identical_arguments(true);
    let mut t = Template::with_options(reuse);
    t.append_argument(Value::custom(Temperature(21.5)), Some("F1"))
        .append_literal(" / ")
        .append_argument(Value::custom(Temperature(21.5)), Some("F1"));

    assert_eq!(t.format(), "{0:F1} / {0:F1}");
    assert_eq!(t.render().unwrap(), "21.5°C / 21.5°C");
}

#[test]
fn test_escaping_disabled_keeps_literal_placeholders() {
    let raw = options().with_auto_escape_curly_braces(false);
    let mut t = Template::with_options(raw);
    t.append_argument("a", None).append_literal(" then {0}");
    assert_eq!(t.render().unwrap(), "a then a");
}

#[test]
fn test_options_from_toml() {
    let options = TemplateOptions::from_str(
        r#"
[template]
reuse_identical_arguments = true
preserve_argument_format = false
"#,
    )
    .unwrap();
    let t = Template::parse_with_options(format_source!("{0:D3}-{1:D3}", 7, 7), options).unwrap();
    assert_eq!(t.format(), "{0}-{0}");
    assert_eq!(t.render().unwrap(), "007-007");
}
