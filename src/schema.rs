// Mirrors the DDL in `data::repositories::migrations`.

diesel::table! {
    entries (id) {
        id -> Integer,
        term -> Text,
        source -> Text,
        radical -> Nullable<Text>,
        stroke_count -> Nullable<Integer>,
        non_radical_stroke_count -> Nullable<Integer>,
    }
}

diesel::table! {
    pronunciations (id) {
        id -> Integer,
        entry_id -> Integer,
        bopomofo -> Nullable<Text>,
        pinyin -> Nullable<Text>,
        definitions -> Nullable<Text>,
    }
}

diesel::joinable!(pronunciations -> entries (entry_id));

diesel::allow_tables_to_appear_in_same_query!(
    entries,
    pronunciations,
);
