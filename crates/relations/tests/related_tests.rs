//! Relationship resolution and related-select composition tests.

use std::collections::BTreeMap;

use model_engine_metadata::{ModelMetadata, ModelsInfo};
use model_engine_relations::{
    ClassResolver, Error, FetchParams, LoadContext, Related, RelatedKind, RelatedOptions,
    RelatedSpec, StackResolver,
};
use model_engine_sql::{AnsiDialect, BindSet, FetchMode, Row, Value};

fn model(class: &str, model_name: &str, table: &str, fetch_cols: &[&str]) -> ModelMetadata {
    ModelMetadata {
        class: class.to_string(),
        model_name: model_name.to_string(),
        table_name: table.to_string(),
        primary_col: "id".to_string(),
        fetch_cols: fetch_cols.iter().map(ToString::to_string).collect(),
        inherit_col: None,
        inherit_val: None,
        paging: 10,
    }
}

fn fixture() -> ModelsInfo {
    let mut models = ModelsInfo::empty();
    models.insert(model("App_Model_Nodes", "nodes", "nodes", &["id", "name", "area_id"]));
    models.insert(model("App_Model_Area", "area", "areas", &["id", "name"]));
    models.insert(model(
        "App_Model_Taggings",
        "tagging",
        "taggings",
        &["id", "node_id", "tag_id"],
    ));
    models.insert(model("App_Model_Tags", "tag", "tags", &["id", "name"]));

    let mut pages = model("App_Model_Pages", "pages", "nodes", &["id", "name"]);
    pages.inherit_col = Some("type".to_string());
    pages.inherit_val = Some("page".to_string());
    models.insert(pages);

    models
}

fn record(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(col, value)| ((*col).to_string(), value.clone()))
        .collect()
}

/// A has-many onto the taggings join table, wired to its `node_id` column.
fn taggings_relation(
    models: &ModelsInfo,
    resolver: &StackResolver,
    native: &ModelMetadata,
) -> Related {
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models,
        resolver,
        siblings: &siblings,
    };
    Related::has_many(
        "taggings",
        RelatedOptions {
            foreign_key: Some("node_id".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap()
}

#[test]
fn belongs_to_defaults_to_name_id_and_foreign_primary() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to("area", RelatedOptions::default(), &ctx).unwrap();
    assert_eq!(related.kind, RelatedKind::BelongsTo);
    assert_eq!(related.native_col, "area_id");
    assert_eq!(related.foreign_col, "id");
    assert_eq!(related.foreign_class, "App_Model_Area");
    assert_eq!(related.foreign_table, "areas");
    assert_eq!(related.foreign_alias, "area");
    assert_eq!(related.fetch, FetchMode::Row);
}

#[test]
fn has_many_defaults_to_native_primary_and_native_name_id() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::has_many("taggings", RelatedOptions::default(), &ctx).unwrap();
    assert_eq!(related.native_col, "id");
    assert_eq!(related.foreign_col, "nodes_id");
    assert_eq!(related.fetch, FetchMode::All);
}

#[test]
fn foreign_key_shorthand_fills_the_kind_specific_column() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let belongs = Related::belongs_to(
        "area",
        RelatedOptions {
            foreign_key: Some("area_fk".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(belongs.native_col, "area_fk");

    let many = Related::has_many(
        "taggings",
        RelatedOptions {
            foreign_key: Some("node_id".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(many.foreign_col, "node_id");

    // an explicit column pins the wiring; the shorthand is ignored
    let pinned = Related::belongs_to(
        "area",
        RelatedOptions {
            native_col: Some("region_id".to_string()),
            foreign_key: Some("area_fk".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(pinned.native_col, "region_id");
}

#[test]
fn fetch_cols_always_include_the_foreign_primary_key() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to(
        "area",
        RelatedOptions {
            cols: Some("name".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(related.cols, vec!["name", "id"]);
}

#[test]
fn inherited_foreign_model_gains_discriminator_column_and_filter() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to(
        "page",
        RelatedOptions {
            class: Some("pages".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();
    assert!(related.cols.contains(&"type".to_string()));
    assert_eq!(related.foreign_inherit_col.as_deref(), Some("type"));
    assert_eq!(related.foreign_inherit_val.as_deref(), Some("page"));

    let owner = record(&[("page_id", Value::Int8(3))]);
    let select = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT page.id,page.name,page.type FROM nodes AS page \
         WHERE page.id = :_rel_page_id AND page.type = :_rel_page_type \
         ORDER BY page.id ASC"
    );
    assert_eq!(
        select.binds().get("_rel_page_type"),
        Some(&Value::Text("page".to_string()))
    );
}

#[test]
fn caller_binds_survive_alongside_generated_ones() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to(
        "page",
        RelatedOptions {
            class: Some("pages".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();

    // a caller placeholder spelled like the discriminator's alias_col pair
    let mut binds = BindSet::new();
    binds.bind("page_type", "odd");
    let params = FetchParams {
        where_: vec!["nodes.name = :page_type".to_string()],
        binds,
        ..FetchParams::default()
    };
    let select = related.new_select(&RelatedSpec::Set(params)).unwrap();
    assert_eq!(
        select.binds().get("page_type"),
        Some(&Value::Text("odd".to_string()))
    );
    assert_eq!(
        select.binds().get("_rel_page_type"),
        Some(&Value::Text("page".to_string()))
    );

    let query = select.compile(&AnsiDialect).unwrap();
    assert!(query.sql.contains("nodes.name = :page_type"));
    assert!(query.sql.contains("page.type = :_rel_page_type"));
}

#[test]
fn class_resolution_tries_stack_then_parallel_then_literal() {
    let mut models = fixture();
    models.insert(model("Acme_Model_Tags", "tag", "tags", &["id", "name"]));
    models.insert(model("Custom_Tags", "tag", "tags", &["id", "name"]));

    let acme_native = model("Acme_Model_Nodes", "nodes", "nodes", &["id", "name"]);

    // hierarchy stack
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    assert_eq!(
        resolver.resolve("tags", native),
        Some("App_Model_Tags".to_string())
    );

    // parallel namespace: no stack hit, same prefix up to the Model_ marker
    let resolver = StackResolver::new(&models, vec![]);
    assert_eq!(
        resolver.resolve("tags", &acme_native),
        Some("Acme_Model_Tags".to_string())
    );

    // literal lookup
    assert_eq!(
        resolver.resolve("Custom_Tags", native),
        Some("Custom_Tags".to_string())
    );

    assert_eq!(resolver.resolve("nonesuch", native), None);
}

#[test]
fn unresolved_relation_fails_at_load_time() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let err = Related::belongs_to("nonesuch", RelatedOptions::default(), &ctx).unwrap_err();
    assert!(matches!(err, Error::UnresolvedRelation { class, .. } if class == "nonesuch"));
}

#[test]
fn belongs_to_record_select_restricts_on_the_native_value() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to("area", RelatedOptions::default(), &ctx).unwrap();
    let owner = record(&[("area_id", Value::Int8(7))]);
    let select = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT area.id,area.name FROM areas AS area \
         WHERE area.id = :_rel_area_id \
         ORDER BY area.id ASC"
    );
    assert_eq!(query.params[0].value, Value::Int8(7));
    assert_eq!(select.fetch_mode(), FetchMode::Row);
}

#[test]
fn record_without_the_native_column_is_an_invalid_spec() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to("area", RelatedOptions::default(), &ctx).unwrap();
    let owner = record(&[("name", Value::Text("x".to_string()))]);
    let err = related.new_select(&RelatedSpec::Record(&owner)).unwrap_err();
    assert!(matches!(err, Error::InvalidSpec { col, .. } if col == "area_id"));
}

#[test]
fn has_many_through_borrows_the_sibling_wiring() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();

    let mut siblings = BTreeMap::new();
    siblings.insert(
        "taggings".to_string(),
        taggings_relation(&models, &resolver, native),
    );
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related =
        Related::has_many_through("tags", "taggings", RelatedOptions::default(), &ctx).unwrap();
    assert_eq!(related.native_col, "id");
    assert_eq!(related.foreign_col, "id");
    assert_eq!(related.through_table.as_deref(), Some("taggings"));
    assert_eq!(related.through_alias.as_deref(), Some("taggings"));
    assert_eq!(related.through_native_col.as_deref(), Some("node_id"));
    assert_eq!(related.through_foreign_col.as_deref(), Some("tag_id"));
}

#[test]
fn has_many_through_without_the_sibling_is_a_configuration_error() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let err = Related::has_many_through("tags", "taggings", RelatedOptions::default(), &ctx)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn has_many_through_record_select_goes_via_the_join_table() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();

    let mut siblings = BTreeMap::new();
    siblings.insert(
        "taggings".to_string(),
        taggings_relation(&models, &resolver, native),
    );
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related =
        Related::has_many_through("tags", "taggings", RelatedOptions::default(), &ctx).unwrap();
    let owner = record(&[("id", Value::Int8(5))]);
    let select = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT tags.id,tags.name FROM tags AS tags \
         INNER JOIN taggings AS taggings ON tags.id = taggings.tag_id \
         WHERE taggings.node_id = :_rel_taggings_node_id \
         ORDER BY tags.id ASC"
    );
    assert_eq!(query.params[0].value, Value::Int8(5));
}

#[test]
fn has_many_through_set_select_joins_a_derived_native_subselect() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();

    let mut siblings = BTreeMap::new();
    siblings.insert(
        "taggings".to_string(),
        taggings_relation(&models, &resolver, native),
    );
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related =
        Related::has_many_through("tags", "taggings", RelatedOptions::default(), &ctx).unwrap();

    let mut binds = BindSet::new();
    binds.bind("pat", "a%");
    let params = FetchParams {
        where_: vec!["nodes.name LIKE :pat".to_string()],
        binds,
        ..FetchParams::default()
    };
    let select = related.new_select(&RelatedSpec::Set(params)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT nodes.id AS nodes__id,tags.id,tags.name FROM tags AS tags \
         INNER JOIN taggings AS taggings ON tags.id = taggings.tag_id \
         INNER JOIN (SELECT nodes.id FROM nodes AS nodes WHERE nodes.name LIKE :pat) AS nodes \
         ON taggings.node_id = nodes.id \
         ORDER BY tags.id ASC"
    );
    assert_eq!(query.params[0].name, "pat");
}

#[test]
fn has_many_set_select_carries_the_native_id_forward() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::has_many(
        "taggings",
        RelatedOptions {
            foreign_key: Some("node_id".to_string()),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();

    let params = FetchParams {
        paging: Some(5),
        page: Some(2),
        ..FetchParams::default()
    };
    let select = related.new_select(&RelatedSpec::Set(params)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT nodes.id AS nodes__id,taggings.id,taggings.node_id,taggings.tag_id \
         FROM taggings AS taggings \
         INNER JOIN (SELECT nodes.id FROM nodes AS nodes LIMIT 5 OFFSET 5) AS nodes \
         ON taggings.node_id = nodes.id \
         ORDER BY taggings.id ASC"
    );
}

#[test]
fn descriptor_options_layer_onto_every_related_select() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::has_many(
        "taggings",
        RelatedOptions {
            foreign_key: Some("node_id".to_string()),
            distinct: true,
            where_: vec!["taggings.tag_id > 0".to_string()],
            order: vec!["taggings.tag_id DESC".to_string()],
            paging: Some(5),
            ..RelatedOptions::default()
        },
        &ctx,
    )
    .unwrap();

    let owner = record(&[("id", Value::Int8(1))]);
    let select = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    let query = select.compile(&AnsiDialect).unwrap();
    similar_asserts::assert_eq!(
        query.sql,
        "SELECT DISTINCT taggings.id,taggings.node_id,taggings.tag_id \
         FROM taggings AS taggings \
         WHERE taggings.node_id = :_rel_taggings_node_id AND taggings.tag_id > 0 \
         ORDER BY taggings.tag_id DESC"
    );
    assert_eq!(select.paging().size(), 5);
}

#[test]
fn a_descriptor_builds_a_fresh_select_per_call() {
    let models = fixture();
    let resolver = StackResolver::new(&models, vec!["App_Model_".to_string()]);
    let native = models.get("App_Model_Nodes").unwrap();
    let siblings = BTreeMap::new();
    let ctx = LoadContext {
        native,
        models: &models,
        resolver: &resolver,
        siblings: &siblings,
    };

    let related = Related::belongs_to("area", RelatedOptions::default(), &ctx).unwrap();
    let before = related.clone();
    let owner = record(&[("area_id", Value::Int8(7))]);

    let first = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    let second = related.new_select(&RelatedSpec::Record(&owner)).unwrap();
    assert_eq!(first, second);
    assert_eq!(related, before);
}
