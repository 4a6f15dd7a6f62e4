use yew::prelude::*;

#[function_component(Live)]
pub fn live() -> Html {
    html! {
        <div class="container">
            <h2>{ "Live" }</h2>
            <p>{ "Current readings from the fermentation thermometer." }</p>
        </div>
    }
}
