mod common;

use common::Person;
use dynsql::{
    Value, columns,
    dsl::*,
    error::{DynSqlError, ErrorCode},
};

#[test]
fn test_grouped_or_then_and() {
    let person = Person::new();
    let model = select([&person.id, &person.first_name, &person.last_name])
        .from(&person.table)
        .where_criterion(
            criterion(&person.first_name, is_equal_to("Fred"))
                .or(&person.first_name, is_equal_to("Wilma")),
        )
        .and(&person.last_name, is_equal_to("Flintstone"))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id, first_name, last_name from Person where (first_name = #{parameters.p1} or first_name = #{parameters.p2}) and last_name = #{parameters.p3}"
    );
    assert_eq!(
        rendered.parameters().iter().collect::<Vec<_>>(),
        vec![
            ("p1", &Value::from("Fred")),
            ("p2", &Value::from("Wilma")),
            ("p3", &Value::from("Flintstone")),
        ]
    );
}

#[test]
fn test_correlated_exists_uses_outer_alias() {
    let item_master = SqlTable::new("ItemMaster");
    let order_line = SqlTable::new("OrderLine");

    let lines = select([order_line.all_columns()])
        .from_aliased(&order_line, "ol")
        .where_clause(
            order_line.column("item_id"),
            is_equal_to_column(item_master.column("item_id")),
        )
        .build()
        .unwrap();
    let model = select([item_master.column("item_id"), item_master.column("description")])
        .from_aliased(&item_master, "im")
        .where_criterion(exists(lines))
        .order_by([item_master.column("item_id")])
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select im.item_id, im.description from ItemMaster im where exists (select ol.* from OrderLine ol where ol.item_id = im.item_id) order by item_id"
    );
    assert!(rendered.parameters().is_empty());
}

#[test]
fn test_exists_parameters_continue_outer_numbering() {
    let item_master = SqlTable::new("ItemMaster");
    let order_line = SqlTable::new("OrderLine");

    let lines = select([order_line.all_columns()])
        .from_aliased(&order_line, "ol")
        .where_clause(
            order_line.column("item_id"),
            is_equal_to_column(item_master.column("item_id")),
        )
        .and(order_line.column("qty"), is_greater_than(5))
        .build()
        .unwrap();
    let model = select([item_master.column("item_id")])
        .from_aliased(&item_master, "im")
        .where_clause(item_master.column("a"), is_equal_to(1))
        .and_criterion(exists(lines))
        .and(item_master.column("b"), is_equal_to(2))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select im.item_id from ItemMaster im where im.a = $1 and exists (select ol.* from OrderLine ol where ol.item_id = im.item_id and ol.qty > $2) and im.b = $3"
    );
    assert_eq!(
        rendered.parameters().keys().collect::<Vec<_>>(),
        vec!["$1", "$2", "$3"]
    );
    assert_eq!(rendered.parameters().get("$2"), Some(&Value::Int(5)));
}

#[test]
fn test_join_without_aliases_qualifies_with_table_names() {
    let student = SqlTable::new("student");
    let registration = SqlTable::new("student_reg");

    let model = select([
        student.column("id"),
        student.column("name"),
        registration.column("semester"),
    ])
    .from(&student)
    .join(
        &registration,
        vec![JoinCriterion::on(
            student.column("id"),
            is_equal_to_column(registration.column("studentId")),
        )],
    )
    .build()
    .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select student.id, student.name, student_reg.semester from student join student_reg on student.id = student_reg.studentId"
    );
}

#[test]
fn test_aliased_left_join_with_bound_join_criterion() {
    let person = Person::new();
    let address = SqlTable::new("Address");

    let model = select([&person.id, &address.column("street")])
        .from_aliased(&person.table, "p")
        .join_table(
            JoinType::Left,
            &address,
            Some("a"),
            vec![
                JoinCriterion::on(&person.id, is_equal_to_column(address.column("person_id"))),
                JoinCriterion::and(address.column("kind"), is_equal_to("home")),
            ],
        )
        .where_clause(&person.age, is_greater_than(21))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select p.id, a.street from Person p left join Address a on p.id = a.person_id and a.kind = :p1 where p.age > :p2"
    );
    assert_eq!(rendered.parameters().get("p1"), Some(&Value::from("home")));
    assert_eq!(rendered.parameters().get("p2"), Some(&Value::Int(21)));
}

#[test]
fn test_self_join_through_aliased_instance() {
    let person = Person::new();
    let manager = person.table.with_alias("m");
    let manager_name = manager.column("first_name");

    let model = select([&person.first_name, &manager_name])
        .from_aliased(&person.table, "p")
        .join(
            &manager,
            vec![JoinCriterion::on(
                manager.column("id"),
                is_equal_to_column(person.table.column("manager_id")),
            )],
        )
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select p.first_name, m.first_name from Person p join Person m on m.id = p.manager_id"
    );
}

#[test]
fn test_conflicting_alias_fails_build() {
    let person = Person::new();
    let err = select([&person.id])
        .from_aliased(&person.table, "p")
        .join_table(
            JoinType::Inner,
            &person.table,
            Some("q"),
            vec![JoinCriterion::on(&person.id, is_equal_to_column(&person.id))],
        )
        .build()
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::DuplicateAlias);
    assert_eq!(
        err.to_string(),
        "[DUPLICATE_ALIAS] Table \"Person\" is already aliased \"p\" and cannot also be aliased \"q\""
    );
}

#[test]
fn test_union_order_and_limit_offset() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_less_than(5))
        .union()
        .select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_greater_than(10))
        .order_by([&person.id])
        .limit(3)
        .offset(1)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id from Person where id < ? union select id from Person where id > ? order by id limit ? offset ?"
    );
    assert_eq!(
        rendered.parameters().iter().collect::<Vec<_>>(),
        vec![
            ("1", &Value::Int(5)),
            ("2", &Value::Int(10)),
            ("3", &Value::Uint(3)),
            ("4", &Value::Uint(1)),
        ]
    );
}

#[test]
fn test_offset_fetch_first() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .offset(2)
        .fetch_first(5)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id from Person offset $1 rows fetch first $2 rows only"
    );
    assert_eq!(rendered.parameters().get("$2"), Some(&Value::Uint(5)));
}

#[test]
fn test_suppressed_conditions_leave_no_dangling_connectors() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_in(Vec::<i32>::new()))
        .and(&person.first_name, is_equal_to_when_present(None::<&str>))
        .and(&person.last_name, is_equal_to("Rubble"))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(rendered.sql(), "select id from Person where last_name = :p1");
    assert_eq!(rendered.parameters().len(), 1);
}

#[test]
fn test_vanished_where_is_omitted_when_allowed() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_equal_to(1).when(|| false))
        .non_rendering_where_clause_allowed(true)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(rendered.sql(), "select id from Person");
}

#[test]
fn test_vanished_where_fails_when_disallowed() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_in(Vec::<i32>::new()))
        .non_rendering_where_clause_allowed(false)
        .build()
        .unwrap();

    let err = model.render(RenderingStrategies::mybatis3()).unwrap_err();
    assert_eq!(err, DynSqlError::NonRenderingClause { clause: "where" });
}

#[test]
fn test_subquery_in_from() {
    let person = Person::new();
    let older = select([&person.id, &person.age])
        .from(&person.table)
        .where_clause(&person.age, is_greater_than(30))
        .build()
        .unwrap();
    let model = select([&person.id])
        .from_subquery(older, Some("older"))
        .where_clause(&person.id, is_less_than(100))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id from (select id, age from Person where age > #{parameters.p1}) older where id < #{parameters.p2}"
    );
}

#[test]
fn test_subselect_condition_shares_numbering() {
    let person = Person::new();
    let adults = select([&person.id])
        .from(&person.table)
        .where_clause(&person.age, is_greater_than(17))
        .build()
        .unwrap();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_in_select(adults))
        .and(&person.first_name, is_equal_to("Barney"))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id from Person where id in (select id from Person where age > $1) and first_name = $2"
    );
    assert_eq!(rendered.parameters().keys().collect::<Vec<_>>(), vec!["$1", "$2"]);
}

#[test]
fn test_group_by_having_with_aliased_aggregate() {
    let person = Person::new();
    let model = select(columns![
        &person.last_name,
        BasicColumn::CountAll.alias("total").unwrap()
    ])
    .from(&person.table)
    .group_by([&person.last_name])
    .having(BasicColumn::CountAll, is_greater_than(1))
    .build()
    .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select last_name, count(*) as total from Person group by last_name having count(*) > :p1"
    );
}

#[test]
fn test_case_insensitive_like() {
    let person = Person::new();
    let model = select_distinct([&person.first_name])
        .from(&person.table)
        .where_clause(&person.first_name, is_like_case_insensitive("fr%"))
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::spring_named_parameter()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select distinct first_name from Person where upper(first_name) like :p1"
    );
    assert_eq!(rendered.parameters().get("p1"), Some(&Value::from("FR%")));
}

#[test]
fn test_typed_columns_annotate_placeholders() {
    let person = Person::typed();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.first_name, is_equal_to("Fred"))
        .and(&person.age, is_between(20, 30))
        .for_update()
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(
        rendered.sql(),
        "select id from Person where first_name = #{parameters.p1,jdbcType=VARCHAR} and age between #{parameters.p2,jdbcType=INTEGER} and #{parameters.p3,jdbcType=INTEGER} for update"
    );
}

#[test]
fn test_select_hooks() {
    let person = Person::new();
    let configuration = StatementConfiguration::default()
        .with_sql_before_statement("/* report */")
        .with_sql_after_keyword("/*+ FULL(Person) */")
        .with_sql_after_table("tablesample system (10)")
        .with_sql_after_statement("-- end");
    let model = select([&person.id])
        .from(&person.table)
        .configuration(configuration)
        .build()
        .unwrap();

    let rendered = model.render(RenderingStrategies::raw_jdbc()).unwrap();
    assert_eq!(
        rendered.sql(),
        "/* report */ select /*+ FULL(Person) */ id from Person tablesample system (10) -- end"
    );
}

#[test]
fn test_count_from() {
    let person = Person::new();
    let model = count_from(&person.table)
        .where_clause(&person.age, is_not_null())
        .build()
        .unwrap();
    let rendered = render(&model, RenderingStrategies::mybatis3()).unwrap();
    assert_eq!(rendered.sql(), "select count(*) from Person where age is not null");
}

#[test]
fn test_rendering_is_repeatable() {
    let person = Person::new();
    let model = select([&person.id])
        .from(&person.table)
        .where_clause(&person.id, is_in([1, 2, 3]))
        .or(&person.last_name, is_like("S%"))
        .build()
        .unwrap();

    let first = model.render(RenderingStrategies::r2dbc()).unwrap();
    let second = model.render(RenderingStrategies::r2dbc()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql(),
        "select id from Person where id in ($1,$2,$3) or last_name like $4"
    );
}
