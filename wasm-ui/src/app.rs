//! Main application component.

use std::rc::Rc;
use users_rs::{ConfigError, Field, RecordId, RecordManager, StoreConfig, config};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::{RecordForm, RecordTable, StatusBanner};
use crate::store::GlooStore;

type Manager = RecordManager<GlooStore>;

/// Store settings baked in at build time.
fn build_config() -> Result<StoreConfig, ConfigError> {
    config_from(
        option_env!("SUPABASE_URL"),
        option_env!("SUPABASE_ANON_KEY"),
        option_env!("USERS_TABLE"),
    )
}

fn config_from(
    url: Option<&str>,
    key: Option<&str>,
    table: Option<&str>,
) -> Result<StoreConfig, ConfigError> {
    StoreConfig::from_lookup(|name| {
        match name {
            config::URL_VAR => url,
            config::KEY_VAR => key,
            config::TABLE_VAR => table,
            _ => None,
        }
        .map(str::to_string)
    })
}

/// Root component: checks the baked-in settings, then mounts the page.
#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| build_config());

    html! {
        <div class="app">
            <header class="header">
                <h1>{ "Users" }</h1>
            </header>
            <main class="main">
                {
                    match &*config {
                        Ok(config) => html! { <UsersPage config={config.clone()} /> },
                        Err(e) => {
                            tracing::error!(error = %e, "store is not configured");
                            html! {
                                <div class="alert error">
                                    <p>{ format!("Store is not configured: {e}") }</p>
                                </div>
                            }
                        }
                    }
                }
            </main>
            <footer class="footer">
                <span class="footer-build">
                    { format!("Build: {} {}", env!("BUILD_COMMIT"), env!("BUILD_TIMESTAMP")) }
                </span>
            </footer>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct UsersPageProps {
    pub config: StoreConfig,
}

/// Create form, update form and records table over one manager.
#[function_component(UsersPage)]
pub fn users_page(props: &UsersPageProps) -> Html {
    let manager: Rc<Manager> = use_memo(props.config.clone(), |config| {
        RecordManager::new(GlooStore::new(config.clone()))
    });
    let redraw = use_force_update();

    // Subscribe once and load the list on mount.
    {
        let manager = manager.clone();
        use_effect_with((), move |_| {
            manager.subscribe(move || redraw.force_update());
            spawn_local(async move {
                let _ = manager.refresh().await;
            });
            || ()
        });
    }

    let on_create_input = {
        let manager = manager.clone();
        Callback::from(move |(field, value): (Field, String)| manager.start_create(field, value))
    };

    let on_create = {
        let manager = manager.clone();
        Callback::from(move |_: ()| {
            let manager = manager.clone();
            spawn_local(async move {
                let _ = manager.submit_create().await;
            });
        })
    };

    let on_update_input = {
        let manager = manager.clone();
        Callback::from(move |(field, value): (Field, String)| manager.start_update(field, value))
    };

    let on_update = {
        let manager = manager.clone();
        Callback::from(move |_: ()| {
            let manager = manager.clone();
            spawn_local(async move {
                let _ = manager.submit_update().await;
            });
        })
    };

    let on_edit = {
        let manager = manager.clone();
        Callback::from(move |id: RecordId| {
            manager.select_for_edit(id);
        })
    };

    let on_delete = {
        let manager = manager.clone();
        Callback::from(move |id: RecordId| {
            let manager = manager.clone();
            spawn_local(async move {
                let _ = manager.remove_record(id).await;
            });
        })
    };

    let view = manager.snapshot();

    html! {
        <>
            <StatusBanner status={view.status.clone()} />

            <section class="panel">
                <h2>{ "Create User" }</h2>
                <RecordForm
                    fields={view.create_draft.clone()}
                    on_input={on_create_input}
                    on_submit={on_create}
                    submit_label="Create User"
                    busy={view.busy.create}
                    placeholders={true}
                />
            </section>

            <section class="panel">
                <h2>
                    { "Update User" }
                    if let Some(id) = view.update_draft.id {
                        <span class="hint">{ format!(" #{id}") }</span>
                    }
                </h2>
                <RecordForm
                    fields={view.update_draft.fields.clone()}
                    on_input={on_update_input}
                    on_submit={on_update}
                    submit_label="Update User"
                    busy={view.busy.update}
                />
            </section>

            <RecordTable
                records={view.records.clone()}
                on_edit={on_edit}
                on_delete={on_delete}
                deleting={view.busy.delete}
            />
        </>
    }
}
