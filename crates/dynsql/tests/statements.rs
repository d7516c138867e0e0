mod common;

use chrono::{TimeZone, Utc};
use common::Person;
use dynsql::{
    JdbcType, Value,
    dsl::*,
    error::{DynSqlError, ErrorCode},
};

#[test]
fn test_delete_with_after_keyword_hook() {
    let person = Person::new();
    let model = delete_from(&person.table)
        .configuration(StatementConfiguration::default().with_sql_after_keyword("/* some comment */"))
        .where_clause(&person.id, is_equal_to(3))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(rendered.sql(), "delete from /* some comment */ Person where id = :p1");
    assert_eq!(rendered.parameters().get("p1"), Some(&Value::Int(3)));
}

#[test]
fn test_aliased_delete_with_order_and_limit() {
    let person = Person::new();
    let model = delete_from_aliased(&person.table, "p")
        .where_clause(&person.id, is_greater_than(5))
        .order_by([&person.id])
        .limit(2)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "delete from Person p where p.id > #{parameters.p1} order by id limit #{parameters.p2}"
    );
    assert_eq!(rendered.parameters().get("p2"), Some(&Value::Uint(2)));
}

#[test]
fn test_delete_without_where() {
    let person = Person::new();
    let model = delete_from(&person.table).build().unwrap();
    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(rendered.sql(), "delete from Person");
}

#[test]
fn test_strict_delete_with_empty_in_list_fails() {
    let person = Person::new();
    let model = delete_from(&person.table)
        .where_clause(&person.id, is_in(Vec::<i64>::new()))
        .non_rendering_where_clause_allowed(false)
        .build()
        .unwrap();

    let err = model.render(RenderingStrategies::raw_jdbc()).unwrap_err();
    assert_eq!(err, DynSqlError::NonRenderingClause { clause: "where" });
    assert_eq!(err.code(), ErrorCode::NonRenderingClause);
    assert!(err.to_string().starts_with("[NON_RENDERING_CLAUSE]"));
}

#[test]
fn test_update_positional_indexed() {
    let animal = SqlTable::new("AnimalData");
    let id = animal.column("id");
    let name = animal.column("animal_name");

    let model = update(&animal)
        .set(&name, "Bat")
        .where_clause(&id, is_equal_to(3))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(rendered.sql(), "update AnimalData set animal_name = $1 where id = $2");
    assert_eq!(
        rendered.parameters().iter().collect::<Vec<_>>(),
        vec![("$1", &Value::from("Bat")), ("$2", &Value::Int(3))]
    );
}

#[test]
fn test_update_mixed_mappings_skip_absent_values() {
    let person = Person::new();
    let model = update(&person.table)
        .set_null(&person.first_name)
        .set_when_present(&person.last_name, None::<String>)
        .set_constant(&person.age, "age + 1")
        .where_clause(&person.id, is_equal_to(7))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "update Person set first_name = null, age = age + 1 where id = :p1"
    );
}

#[test]
fn test_update_with_only_absent_values_fails() {
    let person = Person::new();
    let model = update(&person.table)
        .set_when_present(&person.age, None::<i32>)
        .build()
        .unwrap();

    let err = model.render(RenderingStrategies::mybatis3()).unwrap_err();
    assert_eq!(
        err,
        DynSqlError::MissingRequiredField {
            statement: "Update",
            field: "at least one set mapping"
        }
    );
}

#[test]
fn test_aliased_update_qualifies_columns() {
    let person = Person::new();
    let model = update_aliased(&person.table, "p")
        .set(&person.age, 40)
        .where_clause(&person.id, is_equal_to(1))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "update Person p set p.age = #{parameters.p1} where p.id = #{parameters.p2}"
    );
}

#[test]
fn test_update_from_subselect() {
    let person = Person::new();
    let oldest = select([BasicColumn::Function(
        Function::Max,
        Box::new(BasicColumn::from(&person.age)),
    )])
    .from(&person.table)
    .build()
    .unwrap();

    let model = update(&person.table)
        .set_select(&person.age, oldest)
        .where_clause(&person.id, is_equal_to(9))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "update Person set age = (select max(age) from Person) where id = ?"
    );
}

#[test]
fn test_general_insert_typed() {
    let person = Person::typed();
    let model = insert_into(&person.table)
        .set(&person.id, 1)
        .set(&person.first_name, "Fred")
        .set_null(&person.last_name)
        .set_when_present(&person.age, None::<i32>)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into Person (id, first_name, last_name) values (#{parameters.p1,jdbcType=INTEGER}, #{parameters.p2,jdbcType=VARCHAR}, null)"
    );
    assert_eq!(rendered.parameters().len(), 2);
}

#[test]
fn test_general_insert_positional() {
    let person = Person::new();
    let model = insert_into(&person.table)
        .set(&person.id, 1)
        .set_string_constant(&person.first_name, "O'Brien")
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into Person (id, first_name) values (?, 'O''Brien')"
    );
}

#[test]
fn test_insert_binds_timestamps() {
    let events = SqlTable::new("Events");
    let created = events.typed_column("created_at", JdbcType::Timestamp);
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let model = insert_into(&events).set(&created, at).build().unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(rendered.sql(), "insert into Events (created_at) values (:p1)");
    assert_eq!(rendered.parameters().get("p1"), Some(&Value::Timestamp(at)));
    assert_eq!(
        rendered.parameters().to_json(),
        serde_json::json!({ "p1": "2024-03-01T12:30:00+00:00" })
    );
}

#[test]
fn test_record_insert_binds_properties() {
    let person = Person::typed();
    let model = insert(&person.table)
        .map(&person.id, "id")
        .map(&person.first_name, "firstName")
        .map_string_constant(&person.last_name, "Flintstone")
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into Person (id, first_name, last_name) values (#{row.id,jdbcType=INTEGER}, #{row.firstName,jdbcType=VARCHAR}, 'Flintstone')"
    );
    assert!(rendered.parameters().is_empty());

    let spring = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        spring.sql(),
        "insert into Person (id, first_name, last_name) values (:id, :firstName, 'Flintstone')"
    );
}

#[test]
fn test_record_insert_rejected_by_positional_strategies() {
    let person = Person::new();
    let model = insert(&person.table).map(&person.id, "id").build().unwrap();

    let err = model.render(RenderingStrategies::raw_jdbc()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedOperation);
    assert_eq!(
        err.to_string(),
        "[UNSUPPORTED_OPERATION] Record based insert binding is not supported by the \"jdbc\" rendering strategy"
    );

    let err = model.render(RenderingStrategies::r2dbc()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedOperation);
}

#[test]
fn test_multi_row_insert() {
    let person = Person::new();
    let model = insert_multiple(&person.table, 2)
        .map(&person.id, "id")
        .map(&person.first_name, "firstName")
        .build_multiple()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into Person (id, first_name) values (:records[0].id, :records[0].firstName), (:records[1].id, :records[1].firstName)"
    );

    let typed = Person::typed();
    let model = insert_multiple(&typed.table, 1)
        .map(&typed.id, "id")
        .build_multiple()
        .unwrap();
    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into Person (id) values (#{records[0].id,jdbcType=INTEGER})"
    );

    let err = model.render(RenderingStrategies::raw_jdbc()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedOperation);
}

#[test]
fn test_insert_select() {
    let person = Person::new();
    let archive = SqlTable::new("PersonArchive");
    let archive_id = archive.column("id");
    let archive_name = archive.column("first_name");

    let retirees = select([&person.id, &person.first_name])
        .from(&person.table)
        .where_clause(&person.age, is_greater_than(60))
        .build()
        .unwrap();
    let model = insert_select_into(&archive)
        .columns([&archive_id, &archive_name])
        .select(retirees)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "insert into PersonArchive (id, first_name) select id, first_name from Person where age > $1"
    );
    assert_eq!(rendered.parameters().get("$1"), Some(&Value::Int(60)));
}
