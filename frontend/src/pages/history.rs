use yew::prelude::*;

#[function_component(History)]
pub fn history() -> Html {
    html! {
        <div class="container">
            <h2>{ "History" }</h2>
            <p>{ "Past brews and their temperature logs." }</p>
        </div>
    }
}
