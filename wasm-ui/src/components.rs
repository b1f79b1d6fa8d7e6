//! UI components for the users page.

use users_rs::{Field, Record, RecordFields, RecordId, Status};
use yew::prelude::*;

const LOADING_LABEL: &str = "Loading...";

/// Submit button text: the idle label, or a loading hint while busy.
pub fn submit_label(busy: bool, idle: &'static str) -> &'static str {
    if busy { LOADING_LABEL } else { idle }
}

/// Outcome banner of the last operation.
#[derive(Properties, PartialEq)]
pub struct StatusBannerProps {
    pub status: Option<Status>,
}

#[function_component(StatusBanner)]
pub fn status_banner(props: &StatusBannerProps) -> Html {
    match &props.status {
        Some(status) if !status.message.is_empty() => html! {
            <div class={classes!("alert", status.kind.as_str())}>
                <p>{ &status.message }</p>
            </div>
        },
        _ => html! {},
    }
}

/// Four-field form used for both create and update.
///
/// Inputs are controlled: they always show `fields`, so selecting another
/// record redraws every input.
#[derive(Properties, PartialEq)]
pub struct RecordFormProps {
    pub fields: RecordFields,
    pub on_input: Callback<(Field, String)>,
    pub on_submit: Callback<()>,
    pub submit_label: &'static str,
    pub busy: bool,
    /// Show field labels as placeholders.
    #[prop_or_default]
    pub placeholders: bool,
}

#[function_component(RecordForm)]
pub fn record_form(props: &RecordFormProps) -> Html {
    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <form class="record-form" onsubmit={on_submit}>
            { for Field::ALL.into_iter().map(|field| {
                let on_input = {
                    let on_input = props.on_input.clone();
                    Callback::from(move |e: InputEvent| {
                        let target: web_sys::HtmlInputElement = e.target_unchecked_into();
                        on_input.emit((field, target.value()));
                    })
                };
                html! {
                    <input
                        type={field.input_type()}
                        name={field.name()}
                        placeholder={if props.placeholders { field.label() } else { "" }}
                        value={props.fields.get(field).to_string()}
                        oninput={on_input}
                        required={true}
                    />
                }
            })}
            <button type="submit" class="submit-button">
                { submit_label(props.busy, props.submit_label) }
            </button>
        </form>
    }
}

/// Table of fetched records with per-row Edit and Delete.
#[derive(Properties, PartialEq)]
pub struct RecordTableProps {
    pub records: Vec<Record>,
    pub on_edit: Callback<RecordId>,
    pub on_delete: Callback<RecordId>,
    pub deleting: bool,
}

#[function_component(RecordTable)]
pub fn record_table(props: &RecordTableProps) -> Html {
    html! {
        <table class="record-table">
            <thead>
                <tr>
                    <th>{ "ID" }</th>
                    { for Field::ALL.into_iter().map(|field| html! { <th>{ field.label() }</th> }) }
                    <th>{ "Action" }</th>
                </tr>
            </thead>
            <tbody>
                { for props.records.iter().map(|record| {
                    let id = record.id;
                    let on_edit = {
                        let on_edit = props.on_edit.clone();
                        Callback::from(move |_: MouseEvent| on_edit.emit(id))
                    };
                    let on_delete = {
                        let on_delete = props.on_delete.clone();
                        Callback::from(move |_: MouseEvent| on_delete.emit(id))
                    };
                    html! {
                        <tr key={id.to_string()}>
                            <td>{ id.to_string() }</td>
                            { for Field::ALL.into_iter().map(|field| html! {
                                <td>{ record.fields.get(field).to_string() }</td>
                            }) }
                            <td>
                                <button class="edit-button" onclick={on_edit}>{ "Edit" }</button>
                                <button class="delete-button" onclick={on_delete}>
                                    { submit_label(props.deleting, "Delete") }
                                </button>
                            </td>
                        </tr>
                    }
                })}
            </tbody>
        </table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_label_idle() {
        assert_eq!(submit_label(false, "Create User"), "Create User");
    }

    #[test]
    fn test_submit_label_busy() {
        assert_eq!(submit_label(true, "Update User"), "Loading...");
    }
}
