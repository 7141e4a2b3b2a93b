//! `GET /movies/`: every film with the people appearing in it.

use axum::extract::State;
use axum::response::Html;
use html_escape::encode_text;
use std::fmt::Write;

use crate::graph::Snapshot;
use crate::state::AppState;

pub(super) async fn list_movies(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.cache.read().await;
    Html(render_movies(&snapshot))
}

/// Render the movie table. An empty snapshot renders a table with no rows.
pub fn render_movies(snapshot: &Snapshot) -> String {
    let mut page = String::from(
        "<html><head><title>List of Ghibli's movies</title></head>\
         <body><table><thead><tr>\
         <th>Movie</th><th>People in the movie</th>\
         </tr></thead><tbody>",
    );

    for film in snapshot.films() {
        let people: Vec<String> = snapshot
            .characters_of(film)
            .map(|person| {
                let name = person.name.as_deref().unwrap_or_default();
                match snapshot.species_of(person).and_then(|s| s.name.as_deref()) {
                    Some(species) => format!("{}({})", encode_text(name), encode_text(species)),
                    None => encode_text(name).into_owned(),
                }
            })
            .collect();

        let _ = write!(
            page,
            "<tr><td>{}</td><td>{}</td></tr>",
            encode_text(film.title.as_deref().unwrap_or_default()),
            people.join(", ")
        );
    }

    page.push_str("</tbody></table></body></html>");
    page
}
