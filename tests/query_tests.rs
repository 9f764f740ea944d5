mod common;

use common::fixtures::{petstore, store};
use common::{many, matches, paths};
use pathwalk::{Error, PathError, Query, get, get_with_paths};
use serde_json::json;

#[test]
fn test_authors_of_all_books() {
    let data = store();
    assert_eq!(
        get("$.store.book[*].author", &data).unwrap(),
        json!(["Nigel Rees", "Evelyn Waugh", "Herman Melville", "J. R. R. Tolkien"])
    );
}

#[test]
fn test_all_authors_by_descent() {
    let data = store();
    assert_eq!(
        paths("$..author", &data),
        vec![
            "$.store.book[0].author",
            "$.store.book[1].author",
            "$.store.book[2].author",
            "$.store.book[3].author",
        ]
    );
}

#[test]
fn test_everything_in_store() {
    let data = store();
    assert_eq!(paths("$.store.*", &data), vec!["$.store.book", "$.store.bicycle"]);
}

#[test]
fn test_prices_of_everything_in_store() {
    let data = store();
    assert_eq!(
        many("$.store..price", &data),
        vec![json!(8.95), json!(12.99), json!(8.99), json!(22.99), json!(19.95)]
    );
}

#[test]
fn test_third_book_and_bracket_notation() {
    let data = store();
    assert_eq!(
        get("$['store']['book'][2]['title']", &data).unwrap(),
        json!("Moby Dick")
    );
}

#[test]
fn test_slices() {
    let data = store();
    assert_eq!(
        paths("$.store.book[:2]", &data),
        vec!["$.store.book[0]", "$.store.book[1]"]
    );
    assert_eq!(paths("$.store.book[-1:]", &data), vec!["$.store.book[3]"]);
    assert_eq!(
        paths("$.store.book[::-1]", &data),
        vec![
            "$.store.book[3]",
            "$.store.book[2]",
            "$.store.book[1]",
            "$.store.book[0]",
        ]
    );
    assert_eq!(
        paths("$.store.book[0:4:2]", &data),
        vec!["$.store.book[0]", "$.store.book[2]"]
    );
}

#[test]
fn test_key_list() {
    let data = store();
    assert_eq!(
        matches("$.store.bicycle['price','color','missing']", &data),
        vec![
            ("$.store.bicycle.price".to_string(), json!(19.95)),
            ("$.store.bicycle.color".to_string(), json!("red")),
        ]
    );
    assert_eq!(
        paths("$.store.book[0,3].title", &data),
        vec!["$.store.book[0].title", "$.store.book[3].title"]
    );
}

#[test]
fn test_filter_existence_and_comparison() {
    let data = store();
    assert_eq!(
        get("$.store.book[?(@.isbn)].title", &data).unwrap(),
        json!(["Moby Dick", "The Lord of the Rings"])
    );
    assert_eq!(
        get("$.store.book[?(@.price < 10)].title", &data).unwrap(),
        json!(["Sayings of the Century", "Moby Dick"])
    );
    assert_eq!(
        get("$.store.book[?(@.price > $.expensive)].price", &data).unwrap(),
        json!([12.99, 22.99])
    );
}

#[test]
fn test_filter_with_logic_and_regex() {
    let data = store();
    assert_eq!(
        get(
            "$.store.book[?(@.category == 'fiction' && @.price < 20)].author",
            &data
        )
        .unwrap(),
        json!(["Evelyn Waugh", "Herman Melville"])
    );
    assert_eq!(
        get("$..book[?(@.author =~ '(?i)tolkien')].title", &data).unwrap(),
        json!(["The Lord of the Rings"])
    );
    assert_eq!(
        get("$.store.book[?(!(@.category == 'fiction'))].title", &data).unwrap(),
        json!(["Sayings of the Century"])
    );
}

#[test]
fn test_filter_over_object_members() {
    let data = json!({ "a": { "n": 1 }, "b": { "n": 5 }, "c": { "n": 9 } });
    assert_eq!(paths("$[?(@.n >= 5)]", &data), vec!["$.b", "$.c"]);
}

#[test]
fn test_computed_key() {
    let data = json!({ "selected": "b", "values": { "a": 1, "b": 2 } });
    assert_eq!(get("$.values[($.selected)]", &data).unwrap(), json!(2));

    let list = json!({ "items": [10, 20, 30], "pick": 1 });
    assert_eq!(get("$.items[($.pick + 1)]", &list).unwrap(), json!(30));
}

#[test]
fn test_script_step_must_return_a_path() {
    let data = json!({ "wrapper": { "inner": { "v": 1 } } });
    let result = get_with_paths("$.wrapper.(@.inner)", &data).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].path, vec!["wrapper".to_string(), "inner".to_string()]);
    assert_eq!(result[0].value.as_ref(), &json!({ "v": 1 }));

    assert!(matches!(
        get("$.wrapper.(1 + 1)", &data),
        Err(Error::Path(PathError::InvalidScriptResult { found: "number" }))
    ));
}

#[test]
fn test_bracketed_keys_in_petstore() {
    let data = petstore();
    assert_eq!(
        matches("$.paths['/pets'].*.operationId", &data),
        vec![
            ("$.paths['/pets'].get.operationId".to_string(), json!("listPets")),
            ("$.paths['/pets'].post.operationId".to_string(), json!("createPets")),
        ]
    );
    assert_eq!(
        get("$.paths.*.get.operationId", &data).unwrap(),
        json!(["listPets", "showPetById"])
    );
}

#[test]
fn test_deterministic_errors() {
    let data = store();
    assert!(matches!(
        get("$.store.book[10]", &data),
        Err(Error::Path(PathError::IndexOutOfBounds { index: 10, len: 4 }))
    ));
    assert!(matches!(
        get("$.store.bicycle.color.shade", &data),
        Err(Error::Path(PathError::UnsupportedType { found: "string" }))
    ));
    assert!(matches!(
        get("$.store.book.title", &data),
        Err(Error::Path(PathError::InvalidKeyExpression(_)))
    ));
}

#[test]
fn test_script_rooted_at_document_reports_absolute_path() {
    let data = json!({ "a": 1, "b": 2 });
    let result = get_with_paths("$.a.($.b)", &data).unwrap();
    assert_eq!(result[0].path, vec!["b".to_string()]);
    assert_eq!(result[0].value.as_ref(), &json!(2));
}

#[test]
fn test_nested_invalid_key_is_reported_once() {
    let data = json!({ "a": [1, 2] });
    let err = get("$.a[(@.length)]", &data).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::Path(PathError::InvalidKeyExpression(_))));
    assert_eq!(message.matches("invalid key").count(), 1, "{}", message);
}

#[test]
fn test_found_nothing_is_not_an_error() {
    let data = store();
    assert_eq!(get("$.store.book[?(@.price > 100)]", &data).unwrap(), json!([]));
    assert_eq!(get("$..nothing", &data).unwrap(), json!([]));
    assert_eq!(get("$.expensive.*", &data).unwrap(), json!([]));
}

#[test]
fn test_current_element_outside_filter() {
    let data = json!({ "a": 1 });
    let query = Query::compile("@.a").unwrap();
    assert!(matches!(
        query.evaluate(&data),
        Err(Error::Path(PathError::NoCurrentElement))
    ));
}
