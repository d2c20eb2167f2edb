//! Query compilation: rendering a recorded request tree into wire query text.

use indexmap::IndexMap;

use crate::shape::Shape;
use crate::shape::Slot;

/// Render the request tree recorded on a query-mode shape.
///
/// Depth-first and order-preserving: scalar entries render as their bare name,
/// model entries as `name{ children }`, siblings joined by `,` with no trailing
/// separator. The outermost call wraps the whole query in one extra pair of
/// braces to match the backend's envelope.
pub(crate) fn compile(root: &Shape) -> String {
    format!("{{ {} }}", render(root.type_name(), &root.fields))
}

fn render(name: &str, fields: &IndexMap<String, Slot>) -> String {
    let mut children = String::new();
    for (i, (field, slot)) in fields.iter().enumerate() {
        if i > 0 {
            children.push(',');
        }
        match slot {
            Slot::Scalar(_) => children.push_str(field),
            Slot::Models(shapes) => {
                // Query mode stores exactly one child per model field; its tree
                // is re-derived here rather than mirrored at registration time.
                if let Some(child) = shapes.first() {
                    children.push_str(&render(field, &child.fields));
                }
            }
        }
    }
    format!("{name}{{ {children} }}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::Schema;

    fn movie_schema() -> Arc<Schema> {
        Arc::new(
            Schema::parse(
                "type Movie {\n  title: String!\n  actors: [Person]\n}\ntype Person {\n  name: String!\n  age: Long\n}\n",
            )
            .unwrap(),
        )
    }

    #[test]
    fn single_scalar_leaf() {
        let schema = Arc::new(Schema::parse("type Person {\n  name: String!\n}\n").unwrap());
        let mut person = Shape::for_query(schema, "Person").unwrap();
        person.scalar("name").unwrap();
        assert_eq!(compile(&person), "{ Person{ name } }");
    }

    #[test]
    fn nested_selection_matches_probe_depth() {
        let mut movie = Shape::for_query(movie_schema(), "Movie").unwrap();
        movie.models("actors").unwrap()[0].scalar("name").unwrap();
        assert_eq!(compile(&movie), "{ Movie{ actors{ name } } }");
    }

    #[test]
    fn siblings_join_without_trailing_separator() {
        let mut movie = Shape::for_query(movie_schema(), "Movie").unwrap();
        movie.scalar("title").unwrap();
        movie.models("actors").unwrap()[0].scalar("name").unwrap();
        movie.models("actors").unwrap()[0].scalar("age").unwrap();
        assert_eq!(compile(&movie), "{ Movie{ title,actors{ name,age } } }");
    }

    #[test]
    fn repeat_probing_compiles_identically() {
        let mut once = Shape::for_query(movie_schema(), "Movie").unwrap();
        once.scalar("title").unwrap();

        let mut thrice = Shape::for_query(movie_schema(), "Movie").unwrap();
        for _ in 0..3 {
            thrice.scalar("title").unwrap();
        }
        assert_eq!(compile(&once), compile(&thrice));
    }

    #[test]
    fn two_fields_of_one_nested_model_yield_one_selection() {
        let mut movie = Shape::for_query(movie_schema(), "Movie").unwrap();
        movie.models("actors").unwrap()[0].scalar("name").unwrap();
        movie.models("actors").unwrap()[0].scalar("age").unwrap();
        let compiled = compile(&movie);
        assert_eq!(compiled, "{ Movie{ actors{ name,age } } }");
        assert_eq!(compiled.matches("actors").count(), 1);
    }

    #[test]
    fn untouched_fields_never_appear() {
        let mut movie = Shape::for_query(movie_schema(), "Movie").unwrap();
        movie.scalar("title").unwrap();
        let compiled = compile(&movie);
        assert!(!compiled.contains("actors"));
        assert!(!compiled.contains("age"));
    }
}
