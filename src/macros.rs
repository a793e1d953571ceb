/// Implements [Table](crate::database::Table) for a model, naming its table and the field holding its record id.
///
/// # Example
///
/// ```rust
/// define_table!("videos" : Video = id);
/// ```
#[macro_export]
macro_rules! define_table {
    ($table:literal : $model:ty = $id:ident) => {
        impl $crate::database::Table for $model {
            fn id(&self) -> &$crate::prelude::Thing {
                self.$id.as_ref()
            }

            fn table() -> &'static str {
                $table
            }
        }
    };
}

/// Defines a method to query the database using SurrealQL.
///
/// # Syntax
/// ```
/// [Base Type] > method_name(...arguments) > [Output Type] where "sql query"
/// ```
/// Where the `Base Type` is the type that the method is being defined for and the `Output Type` is what the
/// first statement of the query deserializes into.
///
/// # Example
///
/// ```rust
/// define_relation! {
///     Video > by_url(url: &str) > Option<Video>
///         where "SELECT * FROM videos WHERE url = $url LIMIT 1"
/// }
///
/// let video = Video::by_url("https://youtu.be/YyKh758hwT0", &db).await?;
/// ```
#[macro_export]
macro_rules! define_relation {
    ($model:ty > $relation:ident ($($binding:ident : $binding_type:ty),*) > $export:ty where $query:literal) => {
        impl $model {
            #[tracing::instrument(skip(db))]
            pub async fn $relation($($binding : $binding_type ,)* db: &$crate::database::Database) -> Result<$export, $crate::store::StoreError> {
                use $crate::database::Sql as _;
                db.sql($query)
                    $(.bind((stringify!($binding), $binding)))*
                    .fetch_first()
                    .await
            }
        }
    };
}
