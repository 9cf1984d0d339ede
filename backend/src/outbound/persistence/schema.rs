//! Diesel table definitions, kept in sync with the SQL migrations.

diesel::table! {
    users (id) {
        id -> Uuid,
        username -> Text,
        password_hash -> Text,
    }
}

diesel::table! {
    groups (id) {
        id -> Uuid,
        title -> Text,
        slug -> Text,
        description -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Uuid,
        text -> Text,
        pub_date -> Timestamptz,
        author_id -> Uuid,
        group_id -> Nullable<Uuid>,
        image -> Nullable<Text>,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        text -> Text,
        created -> Timestamptz,
    }
}

diesel::table! {
    follows (user_id, author_id) {
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
