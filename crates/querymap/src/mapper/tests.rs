use super::*;
use serde_json::json;

struct UserProfile;
struct Tag;
struct Post;
struct Role;

fn mapper(name: &str) -> EntityMapper {
    EntityMapperBuilder::new(name).build().unwrap()
}

#[test]
fn test_table_name_derivation() {
    assert_eq!(mapper("UserProfile").table(), "user_profiles");
    assert_eq!(mapper("Tag").table(), "tags");
    assert_eq!(mapper("app::models::UserProfile").table(), "user_profiles");
    assert_eq!(mapper("Wrapper<app::Tag>").table(), "wrappers");
}

#[test]
fn test_for_type_uses_short_type_name() {
    let m = EntityMapperBuilder::for_type::<UserProfile>().build().unwrap();
    assert_eq!(m.table(), "user_profiles");
    assert_eq!(m.foreign_key(), "user_profile_id");

    let m = EntityMapperBuilder::for_type::<Tag>().build().unwrap();
    assert_eq!(m.table(), "tags");
    assert_eq!(m.foreign_key(), "tag_id");
}

#[test]
fn test_foreign_key_derivation() {
    assert_eq!(mapper("UserProfile").foreign_key(), "user_profile_id");
    assert_eq!(mapper("Tag").foreign_key(), "tag_id");
    assert_eq!(mapper("Multi-Word").foreign_key(), "multi_word_id");
}

#[test]
fn test_foreign_key_is_not_pluralized_or_affected_by_table() {
    let m = {
        let mut b = EntityMapperBuilder::new("Person");
        b.table("people");
        b.build().unwrap()
    };
    assert_eq!(m.table(), "people");
    assert_eq!(m.foreign_key(), "person_id");
}

#[test]
fn test_sequence_derivation() {
    assert_eq!(mapper("UserProfile").sequence(), "user_profiles_id_seq");

    let mut b = EntityMapperBuilder::new("Tag");
    b.table("labels").primary_key("label_id");
    let m = b.build().unwrap();
    assert_eq!(m.sequence(), "labels_label_id_seq");

    let mut b = EntityMapperBuilder::new("Tag");
    b.sequence("tag_seq");
    assert_eq!(b.build().unwrap().sequence(), "tag_seq");
}

#[test]
fn test_derived_names_are_cached() {
    let m = mapper("UserProfile");
    let first = m.table();
    let second = m.table();
    assert!(std::ptr::eq(first, second));

    let fk1 = m.foreign_key();
    let fk2 = m.foreign_key();
    assert!(std::ptr::eq(fk1, fk2));
}

#[test]
fn test_default_primary_key() {
    assert_eq!(mapper("Tag").primary_key(), "id");
}

#[test]
fn test_soft_delete_requires_exact_cast() {
    let mut b = EntityMapperBuilder::new("Post");
    b.cast([("deleted_at", "?date")]);
    assert!(b.build().unwrap().supports_soft_delete());

    let mut b = EntityMapperBuilder::new("Post");
    b.cast([("deleted_at", "date")]);
    assert!(!b.build().unwrap().supports_soft_delete());

    let mut b = EntityMapperBuilder::new("Post");
    b.cast([("removed_at", "?date")]);
    assert!(!b.build().unwrap().supports_soft_delete());

    assert!(!mapper("Post").supports_soft_delete());
}

#[test]
fn test_cast_replaces_previous_map() {
    let mut b = EntityMapperBuilder::new("Post");
    b.cast([("deleted_at", "?date"), ("views", "integer")]);
    b.cast([("views", "integer")]);
    let m = b.build().unwrap();

    assert_eq!(m.casts().len(), 1);
    assert_eq!(m.cast_for("views"), Some("integer"));
    assert!(!m.supports_soft_delete());
}

#[test]
fn test_build_rejects_invalid_configuration() {
    let err = EntityMapperBuilder::new("").build().unwrap_err();
    assert!(matches!(err, OrmError::Configuration(_)));

    let mut b = EntityMapperBuilder::new("Tag");
    b.primary_key("");
    assert!(matches!(b.build(), Err(OrmError::Configuration(_))));

    let mut b = EntityMapperBuilder::new("Tag");
    b.table("");
    assert!(matches!(b.build(), Err(OrmError::Configuration(_))));

    let mut b = EntityMapperBuilder::new("Tag");
    b.sequence("");
    assert!(matches!(b.build(), Err(OrmError::Configuration(_))));
}

#[test]
fn test_getters_and_setters_transform_values() {
    let mut b = EntityMapperBuilder::new("User");
    b.getter("name", |v| json!(v.as_str().unwrap_or_default().to_uppercase()))
        .setter("name", |v| json!(v.as_str().unwrap_or_default().trim()));
    let m = b.build().unwrap();

    let record: Record = [("name", json!("alice")), ("age", json!(30))]
        .into_iter()
        .collect();
    assert_eq!(m.read_column(&record, "name"), json!("ALICE"));
    assert_eq!(m.read_column(&record, "age"), json!(30));
    assert_eq!(m.read_column(&record, "missing"), JsonValue::Null);
    assert_eq!(m.write_column("name", json!("  bob ")), json!("bob"));
    assert_eq!(m.write_column("age", json!(31)), json!(31));
}

#[test]
fn test_primary_key_generator() {
    let mut b = EntityMapperBuilder::new("Tag");
    b.primary_key_generator(|record| json!(format!("tag-{}", record.len())));
    let m = b.build().unwrap();

    let record: Record = [("name", json!("rust"))].into_iter().collect();
    assert_eq!(m.generate_primary_key(&record), Some(json!("tag-1")));
    assert!(mapper("Tag").generate_primary_key(&record).is_none());
}

#[test]
fn test_relations_register_and_overwrite() {
    let mut b = EntityMapperBuilder::new("User");
    b.relation("posts").has_many::<Post>(None);
    b.relation("profile").has_one::<UserProfile>(Some("owner_id"));
    b.relation("roles")
        .share_many::<Role>(None, Some(Junction::new("user_roles").key("user_id", "id")));
    b.relation("posts").belongs_to::<Post>(Some("post_id"));
    let m = b.build().unwrap();

    assert_eq!(m.relations().len(), 3);

    let posts = m.relation("posts").unwrap();
    assert_eq!(posts.kind, RelationKind::BelongsTo);
    assert_eq!(posts.foreign_key.as_deref(), Some("post_id"));
    assert!(posts.entity.ends_with("Post"));

    let profile = m.relation("profile").unwrap();
    assert!(!profile.is_many());

    let roles = m.relation("roles").unwrap();
    assert!(roles.is_many());
    let junction = roles.junction.as_ref().unwrap();
    assert_eq!(junction.table, "user_roles");
    assert_eq!(junction.keys.get("user_id").map(String::as_str), Some("id"));
}

#[test]
fn test_relation_factory_returns_stored_descriptor() {
    let mut b = EntityMapperBuilder::new("User");
    let relation = b.relation("tags").share_one::<Tag>(Some("tag_id"), None);
    assert_eq!(relation.kind, RelationKind::ShareOne);
    assert!(relation.junction.is_none());
}
